use anyhow::Context;

use acad_core::entities::CourseSelection;
use acad_core::enums::Role;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{RegisterArgs, RegistrationArgs};
use crate::context::AppContext;
use crate::output::output;

/// Students register themselves; admins may register anyone.
fn ensure_may_act_for(ctx: &AppContext, student: &str) -> anyhow::Result<()> {
    if ctx.actor.is_admin() || (ctx.actor.role == Role::Student && ctx.actor.is_self(student)) {
        return Ok(());
    }
    anyhow::bail!(
        "'{}' may not manage registrations for '{student}'",
        ctx.actor.unique_id
    )
}

/// Handle `acad register`.
pub async fn handle(args: &RegisterArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ensure_may_act_for(ctx, &args.student)?;
    let selection = CourseSelection {
        first: args.first.clone(),
        second: args.second.clone(),
    };
    let receipt = ctx
        .service
        .register(&args.student, &args.session, args.level, &selection, args.credits)
        .await?;
    output(&receipt, flags.format)
}

/// Handle `acad registration`.
pub async fn show(
    args: &RegistrationArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let detail = ctx
        .service
        .get_registration(&args.student, &args.session)
        .await?
        .with_context(|| {
            format!(
                "'{}' has not registered for {}",
                args.student, args.session
            )
        })?;
    output(&detail, flags.format)
}
