use serde::Serialize;

use acad_core::entities::{Account, Session};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    database: String,
    root_admin: Account,
    current_session: Option<Session>,
}

/// Handle `acad init`.
///
/// Opening the context already ran migrations and seeded the root admin; this
/// reports the resulting state.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let root_admin = ctx
        .service
        .get_account(&ctx.config.lifecycle.root_admin_id)
        .await?;
    let response = InitResponse {
        database: ctx.config.database.path.clone(),
        root_admin,
        current_session: ctx.service.current_session().await?,
    };
    output(&response, flags.format)
}
