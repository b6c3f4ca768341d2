//! Goal and key-result models.
//!
//! A `KeyResult` exists only inside its `Goal`. Tasks and habits point at key
//! results through a weak `kr_id`; removing a key result leaves those ids
//! dangling and readers treat them as unlinked.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResult {
    pub id: String,
    pub title: String,
    /// Manually entered progress; live progress comes from linked items.
    #[serde(default)]
    pub progress: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub key_results: Vec<KeyResult>,
}

impl Goal {
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            key_results: Vec::new(),
        }
    }

    pub fn key_result(&self, kr_id: &str) -> Option<&KeyResult> {
        self.key_results.iter().find(|kr| kr.id == kr_id)
    }
}
