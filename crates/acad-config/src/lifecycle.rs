//! Session rollover and account lifecycle settings.

use acad_core::promotion::LevelRule;
use serde::{Deserialize, Serialize};

const fn default_purge_grace_days() -> i64 {
    30
}

fn default_root_admin_id() -> String {
    "1".to_string()
}

const fn default_level_step() -> i64 {
    100
}

const fn default_wrap_threshold() -> i64 {
    500
}

const fn default_intake_level() -> i64 {
    1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LifecycleConfig {
    /// Days between a soft delete and the account becoming purge-eligible.
    #[serde(default = "default_purge_grace_days")]
    pub purge_grace_days: i64,

    /// Identifier of the seeded root admin, never removed by bulk deletes.
    #[serde(default = "default_root_admin_id")]
    pub root_admin_id: String,

    /// Levels gained per promotion.
    #[serde(default = "default_level_step")]
    pub level_step: i64,

    /// Levels at or above this restart at `intake_level` on promotion.
    #[serde(default = "default_wrap_threshold")]
    pub wrap_threshold: i64,

    #[serde(default = "default_intake_level")]
    pub intake_level: i64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            purge_grace_days: default_purge_grace_days(),
            root_admin_id: default_root_admin_id(),
            level_step: default_level_step(),
            wrap_threshold: default_wrap_threshold(),
            intake_level: default_intake_level(),
        }
    }
}

impl LifecycleConfig {
    /// Promotion rule built from the configured step and wraparound.
    #[must_use]
    pub const fn level_rule(&self) -> LevelRule {
        LevelRule {
            step: self.level_step,
            wrap_threshold: self.wrap_threshold,
            intake_level: self.intake_level,
        }
    }
}
