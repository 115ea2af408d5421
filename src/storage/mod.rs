// Storage engine: object registry plus file-backed persistence

mod file;
mod registry;


pub use file::FileStorage;
pub use registry::ObjectRegistry;

use crate::model::{Amenity, BaseModel, City, ClassName, Object, Place, Review};
use anyhow::Result;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Storage interface used by the HTTP layer.
///
/// Objects are owned values: a caller that changes an object it got from
/// `get` must hand it back through `new` (and then `save`) for the change to
/// take effect.
pub trait Storage: Send + Sync {
    /// All objects keyed by `<ClassName>.<id>`, optionally only one class
    fn all(&self, class: Option<ClassName>) -> HashMap<String, Object>;

    /// Register an object, replacing any object under the same key
    fn new(&self, object: Object);

    /// Look up by class and id. None if the id is empty or nothing matches.
    fn get(&self, class: ClassName, id: &str) -> Option<Object>;

    /// Unregister an object. No-op if it was never registered.
    fn delete(&self, object: &Object);

    /// Number of objects, optionally only one class
    fn count(&self, class: Option<ClassName>) -> usize {
        self.all(class).len()
    }

    /// Persist every registered object
    fn save(&self) -> Result<()>;

    /// Load persisted objects into the registry. Never fails: missing or
    /// unreadable state is treated as no state.
    fn reload(&self);

    /// Reset from the persisted state
    fn close(&self) {
        self.reload();
    }

    /// `all` with the class given by name. Unknown names match nothing.
    fn all_named(&self, class: &str) -> HashMap<String, Object> {
        match class.parse::<ClassName>() {
            Ok(class) => self.all(Some(class)),
            Err(_) => HashMap::new(),
        }
    }

    /// `get` with the class given by name. Unknown names match nothing.
    fn get_named(&self, class: &str, id: &str) -> Option<Object> {
        let class = class.parse::<ClassName>().ok()?;
        self.get(class, id)
    }

    /// `count` with the class given by name. Unknown names count zero.
    fn count_named(&self, class: &str) -> usize {
        self.all_named(class).len()
    }

    /// Cities whose `state_id` is the given State
    fn cities_of(&self, state_id: &str) -> Vec<City> {
        let mut cities: Vec<City> = self
            .all(Some(ClassName::City))
            .into_values()
            .filter_map(|object| match object {
                Object::City(city) if city.state_id == state_id => Some(city),
                _ => None,
            })
            .collect();
        cities.sort_by(|a, b| by_creation(&a.base, &b.base));
        cities
    }

    /// Places whose `city_id` is the given City
    fn places_of(&self, city_id: &str) -> Vec<Place> {
        let mut places: Vec<Place> = self
            .all(Some(ClassName::Place))
            .into_values()
            .filter_map(|object| match object {
                Object::Place(place) if place.city_id == city_id => Some(place),
                _ => None,
            })
            .collect();
        places.sort_by(|a, b| by_creation(&a.base, &b.base));
        places
    }

    /// Reviews whose `place_id` is the given Place
    fn reviews_of(&self, place_id: &str) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .all(Some(ClassName::Review))
            .into_values()
            .filter_map(|object| match object {
                Object::Review(review) if review.place_id == place_id => Some(review),
                _ => None,
            })
            .collect();
        reviews.sort_by(|a, b| by_creation(&a.base, &b.base));
        reviews
    }

    /// Amenities linked to a Place, in link order. Dangling ids are skipped.
    fn amenities_of(&self, place: &Place) -> Vec<Amenity> {
        place
            .amenity_ids
            .iter()
            .filter_map(|id| match self.get(ClassName::Amenity, id) {
                Some(Object::Amenity(amenity)) => Some(amenity),
                _ => None,
            })
            .collect()
    }
}

/// Objects of one class as a list, oldest first
pub fn sorted_objects(storage: &dyn Storage, class: ClassName) -> Vec<Object> {
    let mut objects: Vec<Object> = storage.all(Some(class)).into_values().collect();
    objects.sort_by(|a, b| by_creation(a.base(), b.base()));
    objects
}

fn by_creation(a: &BaseModel, b: &BaseModel) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}
