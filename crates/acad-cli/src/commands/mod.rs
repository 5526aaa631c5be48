pub mod account;
pub mod adviser;
pub mod course;
pub mod dispatch;
pub mod grades;
pub mod init;
pub mod register;
pub mod results;
pub mod schema;
pub mod session;
pub mod shared;
