use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Grade;

/// Graded outcome for one student, course, and session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CourseResult {
    pub id: String,
    pub student_id: String,
    pub course_code: String,
    pub session: String,
    pub ca: u32,
    pub exam: u32,
    pub total: u32,
    pub grade: Grade,
    pub point: u8,
    /// Student level at grading time.
    pub level: i64,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of a grade upload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GradeEntry {
    pub student_id: String,
    pub ca: u32,
    pub exam: u32,
}
