//! Repository modules implementing every records-engine operation.
//!
//! Each module adds methods to `AcadService` via `impl AcadService` blocks.
//! Lookup helpers take `&libsql::Connection` so they run unchanged on the
//! primary connection or inside a `WriteTx`.

pub mod account;
pub mod adviser;
pub mod course;
pub mod lifecycle;
pub mod registration;
pub mod result;
pub mod session;
