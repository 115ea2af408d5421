// Entity model and type-tag dispatch

mod amenity;
mod base;
mod city;
mod place;
mod review;
mod state;
mod user;


pub use amenity::{Amenity, AmenityPatch};
pub use base::{timestamp, BaseModel};
pub use city::{City, CityPatch};
pub use place::{Place, PlacePatch};
pub use review::{Review, ReviewPatch};
pub use state::{State, StatePatch};
pub use user::{User, UserPatch};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Record field carrying the type tag
pub const CLASS_FIELD: &str = "__class__";

/// Type tag of every storable object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassName {
    BaseModel,
    State,
    City,
    Amenity,
    User,
    Place,
    Review,
}

impl ClassName {
    pub const ALL: [ClassName; 7] = [
        ClassName::BaseModel,
        ClassName::State,
        ClassName::City,
        ClassName::Amenity,
        ClassName::User,
        ClassName::Place,
        ClassName::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassName::BaseModel => "BaseModel",
            ClassName::State => "State",
            ClassName::City => "City",
            ClassName::Amenity => "Amenity",
            ClassName::User => "User",
            ClassName::Place => "Place",
            ClassName::Review => "Review",
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassName {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BaseModel" => Ok(ClassName::BaseModel),
            "State" => Ok(ClassName::State),
            "City" => Ok(ClassName::City),
            "Amenity" => Ok(ClassName::Amenity),
            "User" => Ok(ClassName::User),
            "Place" => Ok(ClassName::Place),
            "Review" => Ok(ClassName::Review),
            other => Err(RecordError::UnknownClass(other.to_string())),
        }
    }
}

/// Errors turning an untyped record into an Object
#[derive(Debug)]
pub enum RecordError {
    NotAnObject,
    MissingClass,
    UnknownClass(String),
    Invalid(serde_json::Error),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::NotAnObject => write!(f, "record must be a JSON object"),
            RecordError::MissingClass => write!(f, "record has no '{}' field", CLASS_FIELD),
            RecordError::UnknownClass(name) => write!(f, "unknown class '{}'", name),
            RecordError::Invalid(e) => write!(f, "invalid record: {}", e),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<serde_json::Error> for RecordError {
    fn from(e: serde_json::Error) -> Self {
        RecordError::Invalid(e)
    }
}

/// Any storable object, one variant per class
#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    BaseModel(BaseModel),
    State(State),
    City(City),
    Amenity(Amenity),
    User(User),
    Place(Place),
    Review(Review),
}

impl Object {
    pub fn class_name(&self) -> ClassName {
        match self {
            Object::BaseModel(_) => ClassName::BaseModel,
            Object::State(_) => ClassName::State,
            Object::City(_) => ClassName::City,
            Object::Amenity(_) => ClassName::Amenity,
            Object::User(_) => ClassName::User,
            Object::Place(_) => ClassName::Place,
            Object::Review(_) => ClassName::Review,
        }
    }

    pub fn base(&self) -> &BaseModel {
        match self {
            Object::BaseModel(b) => b,
            Object::State(o) => &o.base,
            Object::City(o) => &o.base,
            Object::Amenity(o) => &o.base,
            Object::User(o) => &o.base,
            Object::Place(o) => &o.base,
            Object::Review(o) => &o.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut BaseModel {
        match self {
            Object::BaseModel(b) => b,
            Object::State(o) => &mut o.base,
            Object::City(o) => &mut o.base,
            Object::Amenity(o) => &mut o.base,
            Object::User(o) => &mut o.base,
            Object::Place(o) => &mut o.base,
            Object::Review(o) => &mut o.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    /// Registry key: `<ClassName>.<id>`
    pub fn key(&self) -> String {
        object_key(self.class_name(), self.id())
    }

    pub fn touch(&mut self) {
        self.base_mut().touch();
    }

    /// Flat attribute record including the `__class__` tag
    pub fn to_record(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut record = match self {
            Object::BaseModel(o) => to_map(o)?,
            Object::State(o) => to_map(o)?,
            Object::City(o) => to_map(o)?,
            Object::Amenity(o) => to_map(o)?,
            Object::User(o) => to_map(o)?,
            Object::Place(o) => to_map(o)?,
            Object::Review(o) => to_map(o)?,
        };
        record.insert(
            CLASS_FIELD.to_string(),
            Value::String(self.class_name().as_str().to_string()),
        );
        Ok(record)
    }

    /// Record as rendered to API clients (no password)
    pub fn to_public_record(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut record = self.to_record()?;
        if let Object::User(_) = self {
            record.remove("password");
        }
        Ok(record)
    }

    /// Rebuild a typed object from a stored record, dispatching on `__class__`
    pub fn from_record(record: Value) -> Result<Self, RecordError> {
        let class = match &record {
            Value::Object(map) => match map.get(CLASS_FIELD) {
                Some(Value::String(name)) => name.parse::<ClassName>()?,
                Some(_) | None => return Err(RecordError::MissingClass),
            },
            _ => return Err(RecordError::NotAnObject),
        };

        let object = match class {
            ClassName::BaseModel => Object::BaseModel(serde_json::from_value(record)?),
            ClassName::State => Object::State(serde_json::from_value(record)?),
            ClassName::City => Object::City(serde_json::from_value(record)?),
            ClassName::Amenity => Object::Amenity(serde_json::from_value(record)?),
            ClassName::User => Object::User(serde_json::from_value(record)?),
            ClassName::Place => Object::Place(serde_json::from_value(record)?),
            ClassName::Review => Object::Review(serde_json::from_value(record)?),
        };

        Ok(object)
    }

    /// Apply a client-supplied update.
    ///
    /// Only each class's whitelisted fields are written. Unknown keys and
    /// immutable ones (`id`, timestamps, foreign keys, `User.email`) are
    /// ignored. A whitelisted key with a value of the wrong type is an error.
    pub fn apply_patch(&mut self, body: &Map<String, Value>) -> Result<(), serde_json::Error> {
        match self {
            Object::BaseModel(_) => {}
            Object::State(o) => o.apply_patch(from_map(body)?),
            Object::City(o) => o.apply_patch(from_map(body)?),
            Object::Amenity(o) => o.apply_patch(from_map(body)?),
            Object::User(o) => o.apply_patch(from_map(body)?),
            Object::Place(o) => o.apply_patch(from_map(body)?),
            Object::Review(o) => o.apply_patch(from_map(body)?),
        }
        Ok(())
    }
}

/// Registry key for a class and id
pub fn object_key(class: ClassName, id: &str) -> String {
    format!("{}.{}", class.as_str(), id)
}

fn to_map<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(serde::ser::Error::custom("object did not serialize to a map")),
    }
}

fn from_map<T: DeserializeOwned>(body: &Map<String, Value>) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(body.clone()))
}

macro_rules! impl_from_class {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Object {
                fn from(value: $ty) -> Self {
                    Object::$ty(value)
                }
            }
        )*
    };
}

impl_from_class!(BaseModel, State, City, Amenity, User, Place, Review);
