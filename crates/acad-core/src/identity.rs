use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// The account on whose behalf an operation runs.
///
/// Produced by the authentication collaborator (or the CLI's `--as` flag) and
/// consumed by operations that restrict callers by role or identity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Actor {
    pub unique_id: String,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub fn new(unique_id: impl Into<String>, role: Role) -> Self {
        Self {
            unique_id: unique_id.into(),
            role,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether the actor is acting on their own account.
    #[must_use]
    pub fn is_self(&self, unique_id: &str) -> bool {
        self.unique_id == unique_id
    }
}
