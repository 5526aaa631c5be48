use acad_core::enums::Semester;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a canonical course semester number.
pub fn parse_semester(raw: i64) -> anyhow::Result<Semester> {
    Semester::from_number(raw)
        .ok_or_else(|| anyhow::anyhow!("invalid semester '{raw}': expected 1 or 2"))
}

/// Parse an RFC 3339 instant.
pub fn parse_instant(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use acad_core::enums::{Role, Semester};

    use super::{parse_enum, parse_instant, parse_semester};

    #[test]
    fn parses_snake_case_enum() {
        let role: Role = parse_enum("student", "role").expect("role should parse");
        assert_eq!(role, Role::Student);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let role: Role = parse_enum("course-adviser", "role").expect("role should parse");
        assert_eq!(role, Role::CourseAdviser);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<Role>("dean", "role").expect_err("should fail");
        assert!(err.to_string().contains("invalid role 'dean'"));
    }

    #[test]
    fn semester_must_be_one_or_two() {
        assert_eq!(parse_semester(2).unwrap(), Semester::Second);
        assert!(parse_semester(3).is_err());
    }

    #[test]
    fn instant_requires_rfc3339() {
        assert!(parse_instant("2026-01-01T00:00:00Z", "as-of").is_ok());
        assert!(parse_instant("tomorrow", "as-of").is_err());
    }
}
