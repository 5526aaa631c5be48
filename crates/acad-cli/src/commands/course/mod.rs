mod get;
mod update;

use acad_core::entities::NewCourse;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CourseCommands;
use crate::commands::shared::actor::require_admin;
use crate::commands::shared::parse::parse_semester;
use crate::context::AppContext;
use crate::output::output;

/// Handle `acad course`.
pub async fn handle(
    action: &CourseCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CourseCommands::Create {
            code,
            title,
            credits,
            level,
            semester,
            lecturer,
        } => {
            require_admin(ctx, "create courses")?;
            let new = NewCourse {
                code: code.clone(),
                title: title.clone(),
                credits: *credits,
                level: *level,
                semester: parse_semester(*semester)?,
            };
            let course = ctx.service.create_course(&new, lecturer).await?;
            output(&course, flags.format)
        }
        CourseCommands::Update { .. } => update::run(action, ctx, flags).await,
        CourseCommands::Delete { code } => {
            require_admin(ctx, "delete courses")?;
            ctx.service.delete_course(code).await?;
            output(&serde_json::json!({ "deleted": code }), flags.format)
        }
        CourseCommands::Get { code } => get::run(code, ctx, flags).await,
        CourseCommands::List { level } => {
            let courses = ctx.service.list_courses(*level).await?;
            output(&courses, flags.format)
        }
    }
}
