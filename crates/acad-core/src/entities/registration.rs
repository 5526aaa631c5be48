use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{RegistrationStatus, Semester};

/// A student's enrollment snapshot for one session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Registration {
    pub id: String,
    pub student_id: String,
    pub session: String,
    pub level: i64,
    pub total_credit: i64,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
}

/// One course within a registration, tagged with the term it is taken in.
///
/// The tag is independent of the course's canonical semester so carried-over
/// courses can be taken in either term.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RegistrationLink {
    pub registration_id: String,
    pub course_id: String,
    pub semester: Semester,
}

/// Course IDs a student selects for each term.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CourseSelection {
    #[serde(default)]
    pub first: Vec<String>,
    #[serde(default)]
    pub second: Vec<String>,
}

impl CourseSelection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    /// Every selected course paired with its term, first-semester entries first.
    pub fn tagged(&self) -> impl Iterator<Item = (&str, Semester)> {
        self.first
            .iter()
            .map(|id| (id.as_str(), Semester::First))
            .chain(self.second.iter().map(|id| (id.as_str(), Semester::Second)))
    }
}
