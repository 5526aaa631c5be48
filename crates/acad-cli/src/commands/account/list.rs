use acad_core::enums::Role;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    role: Option<&str>,
    include_deleted: bool,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let role = role.map(|raw| parse_enum::<Role>(raw, "role")).transpose()?;
    let limit = effective_limit(limit, flags.limit, ctx.config.general.default_limit);
    let accounts = ctx
        .service
        .list_accounts(role, include_deleted, limit)
        .await?;
    output(&accounts, flags.format)
}
