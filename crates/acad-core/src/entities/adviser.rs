use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Binding of a course adviser to a session and the level they oversee.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AdviserAssignment {
    pub id: String,
    pub adviser_id: String,
    pub session_id: String,
    pub level_handled: i64,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An assignment joined with its session label, for adviser listings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AdviserAssignmentView {
    pub session_id: String,
    pub session_label: String,
    pub level_handled: i64,
    pub published: bool,
}
