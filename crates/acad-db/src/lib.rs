//! # acad-db
//!
//! libSQL record store for the academic records engine.
//!
//! Holds accounts, sessions, courses, registrations, results, and adviser
//! assignments, and implements every lifecycle operation as methods on
//! [`service::AcadService`]. Multi-row mutations run inside a [`WriteTx`]:
//! an in-process write gate plus a `BEGIN IMMEDIATE` transaction, so two
//! writers never interleave and a failed step rolls the whole operation back.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use std::ops::Deref;

use acad_config::DatabaseConfig;
use error::DatabaseError;
use libsql::{Builder, TransactionBehavior};
use tokio::sync::{Mutex, MutexGuard};

/// Central database handle for all record store operations.
///
/// File-backed stores hand each write transaction its own connection and run
/// in WAL mode, so readers on the primary connection only ever observe
/// committed state. In-memory stores (tests) share the primary connection.
pub struct AcadDb {
    db: libsql::Database,
    conn: libsql::Connection,
    in_memory: bool,
    busy_timeout_ms: u64,
    write_gate: Mutex<()>,
}

impl AcadDb {
    /// Open a local database at the given path with default settings.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open(&DatabaseConfig {
            path: path.to_string(),
            ..DatabaseConfig::default()
        })
        .await
    }

    /// Open the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(&config.path).build().await?;
        let conn = db.connect()?;
        let in_memory = config.is_in_memory();

        configure_connection(&conn, config.busy_timeout_ms).await?;
        if !in_memory {
            let mut rows = conn
                .query("PRAGMA journal_mode = WAL", ())
                .await
                .map_err(|e| DatabaseError::Migration(format!("PRAGMA journal_mode: {e}")))?;
            while rows.next().await?.is_some() {}
        }

        let acad_db = Self {
            db,
            conn,
            in_memory,
            busy_timeout_ms: config.busy_timeout_ms,
            write_gate: Mutex::new(()),
        };
        acad_db.run_migrations().await?;
        Ok(acad_db)
    }

    /// Access the primary libSQL connection for reads.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID, e.g. `"ses-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        generate_id(&self.conn, prefix).await
    }

    /// Begin an exclusive write transaction.
    ///
    /// Waits for the in-process write gate, then issues `BEGIN IMMEDIATE` so
    /// the SQLite write lock is held from the first statement.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Transaction` if the transaction cannot start.
    pub async fn begin_write(&self) -> Result<WriteTx<'_>, DatabaseError> {
        let gate = self.write_gate.lock().await;
        let conn = if self.in_memory {
            self.conn.clone()
        } else {
            let conn = self.db.connect()?;
            configure_connection(&conn, self.busy_timeout_ms).await?;
            conn
        };
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await
            .map_err(|e| DatabaseError::Transaction(format!("begin: {e}")))?;
        tracing::debug!("write transaction started");
        Ok(WriteTx { tx, _gate: gate })
    }
}

/// Generate a prefixed ID on the given connection.
///
/// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or returns no rows.
pub async fn generate_id(
    conn: &libsql::Connection,
    prefix: &str,
) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
            (),
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}

async fn configure_connection(
    conn: &libsql::Connection,
    busy_timeout_ms: u64,
) -> Result<(), DatabaseError> {
    // Enable foreign keys (must be per-connection in SQLite)
    conn.execute("PRAGMA foreign_keys = ON", ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
    let mut rows = conn
        .query(&format!("PRAGMA busy_timeout = {busy_timeout_ms}"), ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;
    while rows.next().await?.is_some() {}
    Ok(())
}

/// An open write transaction holding the in-process write gate.
///
/// Derefs to `libsql::Connection`, so repository helpers take `&Connection`
/// and work the same inside and outside a transaction. Finish it with
/// [`WriteTx::finish`]; dropping it without committing discards the writes.
pub struct WriteTx<'a> {
    tx: libsql::Transaction,
    _gate: MutexGuard<'a, ()>,
}

impl Deref for WriteTx<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl WriteTx<'_> {
    /// Commit all writes.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Transaction` if the commit fails.
    pub async fn commit(self) -> Result<(), DatabaseError> {
        self.tx
            .commit()
            .await
            .map_err(|e| DatabaseError::Transaction(format!("commit: {e}")))?;
        tracing::debug!("write transaction committed");
        Ok(())
    }

    /// Discard all writes.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Transaction` if the rollback fails.
    pub async fn rollback(self) -> Result<(), DatabaseError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DatabaseError::Transaction(format!("rollback: {e}")))?;
        tracing::debug!("write transaction rolled back");
        Ok(())
    }

    /// Commit when `outcome` is `Ok`, roll back when it is `Err`.
    ///
    /// The original error is returned even if the rollback itself fails.
    ///
    /// # Errors
    ///
    /// Returns the outcome's error, or `DatabaseError::Transaction` if the
    /// commit fails.
    pub async fn finish<T>(
        self,
        outcome: Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        match outcome {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_error) = self.rollback().await {
                    tracing::error!(%error, %rollback_error, "rollback failed after error");
                }
                Err(error)
            }
        }
    }
}
