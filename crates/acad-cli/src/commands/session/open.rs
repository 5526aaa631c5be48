use crate::cli::GlobalFlags;
use crate::commands::shared::actor::require_admin;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(label: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_admin(ctx, "open a session")?;
    let summary = ctx.service.open_new_session(label).await?;
    output(&summary, flags.format)
}
