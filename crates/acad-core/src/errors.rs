//! Cross-cutting error types for the records engine.
//!
//! `CoreError` carries the caller-facing failures (bad input, missing records,
//! conflicts, forbidden roles). Storage failures live in `acad_db::error` and
//! wrap this type. `ErrorKind` is the stable classification both map onto.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by engine operations before or independently of storage.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Malformed or missing input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation would duplicate an existing record.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The acting account's role does not permit the operation.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Unauthorized(_) => ErrorKind::Authorization,
            Self::Other(_) => ErrorKind::Storage,
        }
    }
}

/// Stable failure classification exposed to request-routing collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Authorization,
    Transaction,
    Storage,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::Authorization => "authorization",
            Self::Transaction => "transaction",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
