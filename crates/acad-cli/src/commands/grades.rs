use std::path::Path;

use anyhow::Context;

use acad_core::entities::GradeEntry;
use acad_core::enums::Role;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::GradesCommands;
use crate::commands::shared::actor::require_role;
use crate::context::AppContext;
use crate::output::output;

const UPLOAD_ROLES: [Role; 3] = [Role::Admin, Role::Lecturer, Role::CourseAdviser];

/// Handle `acad grades`.
pub async fn handle(
    action: &GradesCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        GradesCommands::Upload {
            course,
            session,
            file,
        } => {
            require_role(ctx, &UPLOAD_ROLES, "upload grades")?;
            let grades = read_grades(Path::new(file))?;
            let summary = ctx.service.upload_grades(course, session, &grades).await?;
            output(&summary, flags.format)
        }
    }
}

fn read_grades(path: &Path) -> anyhow::Result<Vec<GradeEntry>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read grades file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("grades file {} is not a JSON array of grade entries", path.display()))
}
