use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An academic session such as `2024/2025`. Exactly one is current at a time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub label: String,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
}
