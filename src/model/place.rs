use super::BaseModel;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(flatten)]
    pub base: BaseModel,

    #[serde(default)]
    pub name: String,

    /// Fixed at creation
    #[serde(default)]
    pub city_id: String,

    /// Host User id, fixed at creation
    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub number_rooms: i64,

    #[serde(default)]
    pub number_bathrooms: i64,

    #[serde(default)]
    pub max_guest: i64,

    #[serde(default)]
    pub price_by_night: i64,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Linked Amenity ids, in link order
    #[serde(default)]
    pub amenity_ids: Vec<String>,
}

/// Client-writable fields of a Place.
///
/// `amenity_ids` is managed through the link/unlink operations, not patches.
#[derive(Debug, Default, Deserialize)]
pub struct PlacePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub number_rooms: Option<i64>,
    pub number_bathrooms: Option<i64>,
    pub max_guest: Option<i64>,
    pub price_by_night: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Place {
    pub fn new(
        name: impl Into<String>,
        city_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            base: BaseModel::new(),
            name: name.into(),
            city_id: city_id.into(),
            user_id: user_id.into(),
            description: None,
            number_rooms: 0,
            number_bathrooms: 0,
            max_guest: 0,
            price_by_night: 0,
            latitude: None,
            longitude: None,
            amenity_ids: Vec::new(),
        }
    }

    pub fn apply_patch(&mut self, patch: PlacePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(v) = patch.number_rooms {
            self.number_rooms = v;
        }
        if let Some(v) = patch.number_bathrooms {
            self.number_bathrooms = v;
        }
        if let Some(v) = patch.max_guest {
            self.max_guest = v;
        }
        if let Some(v) = patch.price_by_night {
            self.price_by_night = v;
        }
        if let Some(v) = patch.latitude {
            self.latitude = Some(v);
        }
        if let Some(v) = patch.longitude {
            self.longitude = Some(v);
        }
    }

    /// Link an amenity. Returns false if it was already linked.
    pub fn link_amenity(&mut self, amenity_id: &str) -> bool {
        if self.amenity_ids.iter().any(|id| id == amenity_id) {
            return false;
        }
        self.amenity_ids.push(amenity_id.to_string());
        true
    }

    /// Unlink an amenity. Returns false if it was not linked.
    pub fn unlink_amenity(&mut self, amenity_id: &str) -> bool {
        let before = self.amenity_ids.len();
        self.amenity_ids.retain(|id| id != amenity_id);
        self.amenity_ids.len() != before
    }
}
