use anyhow::Context;

use crate::context::AppContext;

/// Use the given session label, or fall back to the current session.
pub async fn session_label_or_current(
    ctx: &AppContext,
    label: Option<&str>,
) -> anyhow::Result<String> {
    if let Some(label) = label {
        return Ok(label.to_string());
    }
    let current = ctx
        .service
        .current_session()
        .await?
        .context("no current session; pass --session or run 'acad session open'")?;
    Ok(current.label)
}
