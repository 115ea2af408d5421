use crate::model::{object_key, ClassName, Object};
use dashmap::DashMap;
use std::collections::HashMap;

/// In-memory registry of live objects keyed by `<ClassName>.<id>`
pub struct ObjectRegistry {
    /// Concurrent map so request handlers on different threads can share it
    objects: DashMap<String, Object>,
}

impl ObjectRegistry {
    /// Create empty registry
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
        }
    }

    /// Snapshot of all objects, optionally restricted to one class
    pub fn all(&self, class: Option<ClassName>) -> HashMap<String, Object> {
        self.objects
            .iter()
            .filter(|entry| class.map_or(true, |c| entry.value().class_name() == c))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Insert under the object's derived key, replacing any previous entry
    pub fn insert(&self, object: Object) {
        self.objects.insert(object.key(), object);
    }

    /// Look up by class and id
    pub fn get(&self, class: ClassName, id: &str) -> Option<Object> {
        if id.is_empty() {
            return None;
        }
        self.objects
            .get(&object_key(class, id))
            .map(|entry| entry.value().clone())
    }

    /// Remove the object's entry if present
    pub fn remove(&self, object: &Object) -> Option<Object> {
        self.objects.remove(&object.key()).map(|(_, removed)| removed)
    }

    pub fn count(&self, class: Option<ClassName>) -> usize {
        match class {
            None => self.objects.len(),
            Some(c) => self
                .objects
                .iter()
                .filter(|entry| entry.value().class_name() == c)
                .count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
