//! Course update builder.

use acad_core::enums::Semester;
use serde::Serialize;

/// Partial update of a course. `lecturer_ids`, when present, is the full
/// desired set of attached lecturers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<Semester>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lecturer_ids: Option<Vec<String>>,
}

impl CourseUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.credits.is_none()
            && self.level.is_none()
            && self.semester.is_none()
            && self.lecturer_ids.is_none()
    }
}

pub struct CourseUpdateBuilder(CourseUpdate);

impl Default for CourseUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CourseUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn credits(mut self, credits: i64) -> Self {
        self.0.credits = Some(credits);
        self
    }

    #[must_use]
    pub const fn level(mut self, level: i64) -> Self {
        self.0.level = Some(level);
        self
    }

    #[must_use]
    pub const fn semester(mut self, semester: Semester) -> Self {
        self.0.semester = Some(semester);
        self
    }

    #[must_use]
    pub fn lecturer_ids(mut self, lecturer_ids: Vec<String>) -> Self {
        self.0.lecturer_ids = Some(lecturer_ids);
        self
    }

    #[must_use]
    pub fn build(self) -> CourseUpdate {
        self.0
    }
}
