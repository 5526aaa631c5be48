mod account;
mod adviser;
mod course;
mod grades;
mod session;

pub use account::AccountCommands;
pub use adviser::AdviserCommands;
pub use course::CourseCommands;
pub use grades::GradesCommands;
pub use session::SessionCommands;
