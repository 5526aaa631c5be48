mod create;
mod list;
mod purge;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AccountCommands;
use crate::commands::shared::actor::require_admin;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `acad account`.
pub async fn handle(
    action: &AccountCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AccountCommands::Create { .. } => create::run(action, ctx, flags).await,
        AccountCommands::Approve { unique_id } => {
            require_admin(ctx, "approve accounts")?;
            let account = ctx.service.approve_account(unique_id).await?;
            output(&account, flags.format)
        }
        AccountCommands::Role { unique_id, role } => {
            require_admin(ctx, "change roles")?;
            let role = parse_enum(role, "role")?;
            let account = ctx.service.update_role(unique_id, role).await?;
            output(&account, flags.format)
        }
        AccountCommands::Get { unique_id } => {
            let account = ctx.service.get_account(unique_id).await?;
            output(&account, flags.format)
        }
        AccountCommands::List {
            role,
            include_deleted,
            limit,
        } => list::run(role.as_deref(), *include_deleted, *limit, ctx, flags).await,
        AccountCommands::Stats => {
            require_admin(ctx, "view account statistics")?;
            let stats = ctx.service.account_stats().await?;
            output(&stats, flags.format)
        }
        AccountCommands::Delete { unique_id } => {
            let receipt = ctx.service.soft_delete(&ctx.actor, unique_id).await?;
            output(&receipt, flags.format)
        }
        AccountCommands::Restore { unique_id } => {
            require_admin(ctx, "restore accounts")?;
            let account = ctx.service.restore(unique_id).await?;
            output(&account, flags.format)
        }
        AccountCommands::DeleteMany { ids } => {
            let report = ctx.service.bulk_soft_delete(&ctx.actor, ids).await?;
            output(&report, flags.format)
        }
        AccountCommands::PurgeCandidates { as_of } => {
            purge::run(as_of.as_deref(), ctx, flags).await
        }
    }
}
