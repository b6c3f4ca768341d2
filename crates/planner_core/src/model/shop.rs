//! Reward catalog and purchase receipts.

use serde::{Deserialize, Serialize};

/// Catalog entry redeemable with earned points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub title: String,
    pub cost: i64,
    #[serde(default)]
    pub icon: String,
}

/// Immutable receipt written at redemption time.
///
/// Holds a copy of the reward title and cost; later catalog edits or deletes
/// never touch existing receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub id: String,
    pub reward_id: String,
    pub reward_title: String,
    pub cost: i64,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

impl PurchaseRecord {
    pub fn receipt_for(id: String, reward: &Reward, timestamp: i64) -> Self {
        Self {
            id,
            reward_id: reward.id.clone(),
            reward_title: reward.title.clone(),
            cost: reward.cost,
            timestamp,
        }
    }
}
