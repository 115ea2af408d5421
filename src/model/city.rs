use super::BaseModel;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(flatten)]
    pub base: BaseModel,

    #[serde(default)]
    pub name: String,

    /// Owning State id, fixed at creation
    #[serde(default)]
    pub state_id: String,
}

/// Client-writable fields of a City. `state_id` is not one of them.
#[derive(Debug, Default, Deserialize)]
pub struct CityPatch {
    pub name: Option<String>,
}

impl City {
    pub fn new(name: impl Into<String>, state_id: impl Into<String>) -> Self {
        Self {
            base: BaseModel::new(),
            name: name.into(),
            state_id: state_id.into(),
        }
    }

    pub fn apply_patch(&mut self, patch: CityPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
    }
}
