use chrono::Utc;

use crate::cli::GlobalFlags;
use crate::commands::shared::actor::require_admin;
use crate::commands::shared::parse::parse_instant;
use crate::context::AppContext;
use crate::output::output;

/// Report soft-deleted accounts past their retention window. Nothing is erased.
pub async fn run(as_of: Option<&str>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_admin(ctx, "list purge candidates")?;
    let now = match as_of {
        Some(raw) => parse_instant(raw, "as-of")?,
        None => Utc::now(),
    };
    let candidates = ctx.service.purge_candidates(now).await?;
    tracing::debug!(count = candidates.len(), as_of = %now, "purge candidates listed");
    output(&candidates, flags.format)
}
