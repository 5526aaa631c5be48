//! Level promotion arithmetic applied on session rollover.
//!
//! ```text
//! level >= wrap_threshold → intake_level
//! otherwise               → level + step
//! ```
//!
//! With the defaults (step 100, threshold 500, intake 1) a 400-level student
//! moves to 500 and a 500-level student restarts at the intake marker `1`.
//! No graduation status is inferred.

use serde::{Deserialize, Serialize};

/// Parameters of the promotion rule shared by students and advisers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRule {
    pub step: i64,
    pub wrap_threshold: i64,
    pub intake_level: i64,
}

impl Default for LevelRule {
    fn default() -> Self {
        Self {
            step: 100,
            wrap_threshold: 500,
            intake_level: 1,
        }
    }
}

impl LevelRule {
    /// Level reached after one promotion.
    #[must_use]
    pub const fn next_level(&self, level: i64) -> i64 {
        if level >= self.wrap_threshold {
            self.intake_level
        } else {
            level + self.step
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 100)]
    #[case(1, 101)]
    #[case(100, 200)]
    #[case(400, 500)]
    #[case(500, 1)]
    #[case(600, 1)]
    fn default_rule(#[case] level: i64, #[case] expected: i64) {
        assert_eq!(LevelRule::default().next_level(level), expected);
    }

    #[test]
    fn custom_threshold_wraps_earlier() {
        let rule = LevelRule {
            step: 100,
            wrap_threshold: 400,
            intake_level: 100,
        };
        assert_eq!(rule.next_level(300), 400);
        assert_eq!(rule.next_level(400), 100);
    }
}
