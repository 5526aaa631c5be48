//! Grade calculator.
//!
//! Pure derivation of total, letter and point from continuous-assessment and
//! exam scores. Range checks against configured maxima happen at ingestion.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Grade;

/// Derived grade for one (CA, exam) pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GradeOutcome {
    pub total: u32,
    pub grade: Grade,
    pub point: u8,
}

/// Compute total, letter grade and grade point.
#[must_use]
pub const fn grade_scores(ca: u32, exam: u32) -> GradeOutcome {
    let total = ca.saturating_add(exam);
    let grade = Grade::from_total(total);
    GradeOutcome {
        total,
        grade,
        point: grade.points(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(40, 30, 70, Grade::A, 5)]
    #[case(30, 29, 59, Grade::C, 3)]
    #[case(20, 20, 40, Grade::F, 0)]
    #[case(39, 30, 69, Grade::B, 4)]
    #[case(30, 30, 60, Grade::B, 4)]
    #[case(25, 25, 50, Grade::C, 3)]
    #[case(20, 29, 49, Grade::D, 2)]
    #[case(20, 25, 45, Grade::D, 2)]
    #[case(20, 24, 44, Grade::F, 0)]
    #[case(0, 0, 0, Grade::F, 0)]
    #[case(100, 100, 200, Grade::A, 5)]
    fn bands_match_table(
        #[case] ca: u32,
        #[case] exam: u32,
        #[case] total: u32,
        #[case] grade: Grade,
        #[case] point: u8,
    ) {
        assert_eq!(grade_scores(ca, exam), GradeOutcome { total, grade, point });
    }

    #[test]
    fn points_never_increase_as_total_drops() {
        let mut previous = u8::MAX;
        for total in (0..=200).rev() {
            let point = grade_scores(total, 0).point;
            assert!(point <= previous, "point rose at total {total}");
            previous = point;
        }
    }
}
