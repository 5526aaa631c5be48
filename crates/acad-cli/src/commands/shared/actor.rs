use acad_core::enums::Role;

use crate::context::AppContext;

/// Fail unless the acting account holds one of `roles`.
pub fn require_role(ctx: &AppContext, roles: &[Role], action: &str) -> anyhow::Result<()> {
    if roles.contains(&ctx.actor.role) {
        return Ok(());
    }
    anyhow::bail!(
        "'{}' ({}) may not {action}",
        ctx.actor.unique_id,
        ctx.actor.role
    )
}

pub fn require_admin(ctx: &AppContext, action: &str) -> anyhow::Result<()> {
    require_role(ctx, &[Role::Admin], action)
}
