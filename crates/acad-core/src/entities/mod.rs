//! Entity structs for all records-engine domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `crates/acad-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON output and schema export.

mod account;
mod adviser;
mod course;
mod registration;
mod result;
mod session;

pub use account::{Account, NewAccount};
pub use adviser::{AdviserAssignment, AdviserAssignmentView};
pub use course::{Course, NewCourse};
pub use registration::{CourseSelection, Registration, RegistrationLink};
pub use result::{CourseResult, GradeEntry};
pub use session::Session;
