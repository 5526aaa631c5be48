use acad_core::enums::Role;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ResultsArgs;
use crate::commands::shared::actor::require_role;
use crate::context::AppContext;
use crate::output::output;

/// Handle `acad results`.
pub async fn handle(args: &ResultsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(course) = &args.course {
        require_role(
            ctx,
            &[Role::Admin, Role::Lecturer, Role::CourseAdviser],
            "view unpublished results",
        )?;
        let session = args
            .session
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("--session is required with --course"))?;
        let results = ctx.service.course_results(course, session).await?;
        return output(&results, flags.format);
    }

    let student = args
        .student
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("pass --student or --course"))?;
    if ctx.actor.role == Role::Student && !ctx.actor.is_self(student) {
        anyhow::bail!("students may only view their own results");
    }
    let results = ctx
        .service
        .student_results(student, args.session.as_deref())
        .await?;
    output(&results, flags.format)
}
