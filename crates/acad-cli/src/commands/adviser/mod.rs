mod publish;

use acad_core::enums::Role;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AdviserCommands;
use crate::commands::shared::actor::require_admin;
use crate::commands::shared::session::session_label_or_current;
use crate::context::AppContext;
use crate::output::output;

/// Handle `acad adviser`.
pub async fn handle(
    action: &AdviserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AdviserCommands::Assign {
            adviser,
            level,
            session,
        } => {
            require_admin(ctx, "assign adviser levels")?;
            let label = session_label_or_current(ctx, session.as_deref()).await?;
            let assignment = ctx
                .service
                .assign_adviser_level(adviser, *level, &label)
                .await?;
            output(&assignment, flags.format)
        }
        AdviserCommands::Publish {
            adviser,
            level,
            session,
        } => publish::run(adviser.as_deref(), *level, session.as_deref(), ctx, flags).await,
        AdviserCommands::List { adviser } => {
            let views = ctx.service.adviser_assignments(adviser).await?;
            output(&views, flags.format)
        }
    }
}

/// Only admins may act on another adviser's behalf.
fn acting_adviser<'a>(ctx: &'a AppContext, requested: Option<&'a str>) -> anyhow::Result<&'a str> {
    match requested {
        Some(id) if id != ctx.actor.unique_id => {
            require_admin(ctx, "publish on another adviser's behalf")?;
            Ok(id)
        }
        Some(id) => Ok(id),
        None if ctx.actor.role == Role::CourseAdviser => Ok(ctx.actor.unique_id.as_str()),
        None => anyhow::bail!("pass --adviser or act as a course adviser with --as"),
    }
}
