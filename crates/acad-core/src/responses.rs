//! Response types returned by engine operations.
//!
//! These are also the JSON shapes printed by the `acad` CLI.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Registration, RegistrationLink, Session};

/// Returned by `register`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub registration_id: String,
    pub total_registered: usize,
}

/// A registration with its course links.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RegistrationDetail {
    pub registration: Registration,
    pub links: Vec<RegistrationLink>,
}

/// Returned by `open_new_session`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PromotionSummary {
    pub session: Session,
    pub students_promoted: u64,
    pub advisers_promoted: u64,
    pub assignments_created: u64,
}

/// Returned by `upload_grades`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UploadSummary {
    pub course_code: String,
    pub session: String,
    pub count: usize,
}

/// Returned by `publish_results`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PublishReceipt {
    pub adviser_id: String,
    pub session_id: String,
    pub level_handled: i64,
    pub results_published: u64,
}

/// Returned by `soft_delete`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SoftDeleteReceipt {
    pub unique_id: String,
    pub purge_after: DateTime<Utc>,
}

/// Returned by `bulk_soft_delete`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub marked_count: u64,
    pub skipped: Vec<String>,
    pub purge_after: DateTime<Utc>,
}

/// Account counts per role.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RoleCounts {
    pub admin: i64,
    pub lecturer: i64,
    pub course_adviser: i64,
    pub student: i64,
}

/// Returned by `account_stats`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AccountStats {
    pub total_accounts: i64,
    pub roles: RoleCounts,
    pub pending_approvals: i64,
    pub current_session: Option<String>,
}
