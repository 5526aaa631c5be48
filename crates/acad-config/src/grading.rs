//! Score limits applied when grades are ingested.

use serde::{Deserialize, Serialize};

const fn default_max_ca() -> u32 {
    40
}

const fn default_max_exam() -> u32 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GradingConfig {
    /// Highest accepted continuous-assessment score.
    #[serde(default = "default_max_ca")]
    pub max_ca: u32,

    /// Highest accepted exam score.
    #[serde(default = "default_max_exam")]
    pub max_exam: u32,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            max_ca: default_max_ca(),
            max_exam: default_max_exam(),
        }
    }
}
