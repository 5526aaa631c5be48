use schemars::{Schema, schema_for};

use acad_core::entities::{
    Account, AdviserAssignment, Course, CourseResult, GradeEntry, NewAccount, NewCourse,
    Registration, Session,
};
use acad_core::responses::{
    AccountStats, BulkDeleteReport, PromotionSummary, PublishReceipt, RegistrationDetail,
};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Entity names accepted by `acad schema`.
const ENTITIES: [&str; 14] = [
    "account",
    "new-account",
    "session",
    "course",
    "new-course",
    "registration",
    "registration-detail",
    "course-result",
    "grade-entry",
    "adviser-assignment",
    "promotion-summary",
    "publish-receipt",
    "bulk-delete-report",
    "account-stats",
];

fn schema_for_entity(name: &str) -> Option<Schema> {
    let schema = match name.replace('_', "-").as_str() {
        "account" => schema_for!(Account),
        "new-account" => schema_for!(NewAccount),
        "session" => schema_for!(Session),
        "course" => schema_for!(Course),
        "new-course" => schema_for!(NewCourse),
        "registration" => schema_for!(Registration),
        "registration-detail" => schema_for!(RegistrationDetail),
        "course-result" => schema_for!(CourseResult),
        "grade-entry" => schema_for!(GradeEntry),
        "adviser-assignment" => schema_for!(AdviserAssignment),
        "promotion-summary" => schema_for!(PromotionSummary),
        "publish-receipt" => schema_for!(PublishReceipt),
        "bulk-delete-report" => schema_for!(BulkDeleteReport),
        "account-stats" => schema_for!(AccountStats),
        _ => return None,
    };
    Some(schema)
}

/// Handle `acad schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = schema_for_entity(&args.entity).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown entity '{}'; expected one of: {}",
            args.entity,
            ENTITIES.join(", ")
        )
    })?;
    output(&schema, flags.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_entity_has_a_schema() {
        for name in ENTITIES {
            assert!(schema_for_entity(name).is_some(), "missing schema for {name}");
        }
    }

    #[test]
    fn underscores_are_accepted() {
        assert!(schema_for_entity("course_result").is_some());
    }

    #[test]
    fn unknown_entity_has_no_schema() {
        assert!(schema_for_entity("transcript").is_none());
    }

    #[test]
    fn account_schema_names_role() {
        let schema = schema_for_entity("account").unwrap();
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json["properties"]["role"].is_object());
    }
}
