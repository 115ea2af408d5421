use super::BaseModel;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(flatten)]
    pub base: BaseModel,

    #[serde(default)]
    pub text: String,

    /// Fixed at creation
    #[serde(default)]
    pub place_id: String,

    /// Author, fixed at creation
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewPatch {
    pub text: Option<String>,
}

impl Review {
    pub fn new(
        text: impl Into<String>,
        place_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            base: BaseModel::new(),
            text: text.into(),
            place_id: place_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn apply_patch(&mut self, patch: ReviewPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
    }
}
