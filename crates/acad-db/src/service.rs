//! Service layer owning the record store and the policies applied to it.
//!
//! `AcadService` wraps `AcadDb` (raw database access) together with the
//! lifecycle and grading settings from `acad-config`. All repository methods
//! are implemented as `impl AcadService` blocks under `repos/`.

use acad_config::{AcadConfig, GradingConfig, LifecycleConfig};

use crate::AcadDb;
use crate::error::DatabaseError;

/// Entry point for every records-engine operation.
///
/// Every mutation follows the same protocol:
/// 1. Validate input (no database access)
/// 2. Begin a write transaction
/// 3. Look up referenced records, then execute SQL
/// 4. Commit on success, roll back on any error
pub struct AcadService {
    db: AcadDb,
    lifecycle: LifecycleConfig,
    grading: GradingConfig,
}

impl AcadService {
    /// Create a service over a local database with default policies.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = AcadDb::open_local(db_path).await?;
        Ok(Self::from_db(
            db,
            LifecycleConfig::default(),
            GradingConfig::default(),
        ))
    }

    /// Create a service from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn from_config(config: &AcadConfig) -> Result<Self, DatabaseError> {
        let db = AcadDb::open(&config.database).await?;
        tracing::debug!(path = %config.database.path, "record store opened");
        Ok(Self::from_db(
            db,
            config.lifecycle.clone(),
            config.grading.clone(),
        ))
    }

    /// Create from an existing `AcadDb`.
    #[must_use]
    pub const fn from_db(db: AcadDb, lifecycle: LifecycleConfig, grading: GradingConfig) -> Self {
        Self {
            db,
            lifecycle,
            grading,
        }
    }

    /// Access the underlying database.
    #[must_use]
    pub const fn db(&self) -> &AcadDb {
        &self.db
    }

    #[must_use]
    pub const fn lifecycle(&self) -> &LifecycleConfig {
        &self.lifecycle
    }

    #[must_use]
    pub const fn grading(&self) -> &GradingConfig {
        &self.grading
    }
}
