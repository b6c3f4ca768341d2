//! Entity id generation.
//!
//! Ids are opaque strings. Seeded entities use short fixed ids (`lib1`, `h1`);
//! everything created at runtime gets `<prefix>-<uuid v4>` so a fresh id never
//! collides with an existing one.

use uuid::Uuid;

pub const LIBRARY_ID_PREFIX: &str = "lib";
pub const INSTANCE_ID_PREFIX: &str = "t";
pub const TEMP_TASK_ID_PREFIX: &str = "tmp";
pub const HABIT_ID_PREFIX: &str = "h";
pub const HABIT_INSTANCE_ID_PREFIX: &str = "hi";
pub const GOAL_ID_PREFIX: &str = "g";
pub const KEY_RESULT_ID_PREFIX: &str = "kr";
pub const REWARD_ID_PREFIX: &str = "r";
pub const PURCHASE_ID_PREFIX: &str = "pr";
pub const SCORE_DEF_ID_PREFIX: &str = "sd";
pub const REFLECTION_TEMPLATE_ID_PREFIX: &str = "tpl";

/// Returns a new globally unique id carrying `prefix`.
pub fn new_entity_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
