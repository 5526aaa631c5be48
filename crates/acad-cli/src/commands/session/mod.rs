mod list;
mod open;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SessionCommands;
use crate::commands::shared::actor::require_admin;
use crate::context::AppContext;
use crate::output::output;

/// Handle `acad session`.
pub async fn handle(
    action: &SessionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SessionCommands::Open { label } => open::run(label, ctx, flags).await,
        SessionCommands::SetCurrent { label } => {
            require_admin(ctx, "set the current session")?;
            let session = ctx.service.set_current_session(label).await?;
            output(&session, flags.format)
        }
        SessionCommands::Current => {
            let session = ctx.service.current_session().await?;
            output(&session, flags.format)
        }
        SessionCommands::List { limit } => list::run(*limit, ctx, flags).await,
    }
}
