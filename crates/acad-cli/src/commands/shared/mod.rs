pub mod actor;
pub mod limit;
pub mod parse;
pub mod session;
