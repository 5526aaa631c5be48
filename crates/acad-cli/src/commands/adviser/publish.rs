use crate::cli::GlobalFlags;
use crate::commands::shared::session::session_label_or_current;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    adviser: Option<&str>,
    level: i64,
    session: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let adviser_id = super::acting_adviser(ctx, adviser)?;
    let label = session_label_or_current(ctx, session).await?;
    let session = ctx.service.get_session_by_label(&label).await?;
    let receipt = ctx
        .service
        .publish_results(adviser_id, &session.id, level)
        .await?;
    output(&receipt, flags.format)
}
