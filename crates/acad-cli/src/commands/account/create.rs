use acad_core::entities::NewAccount;
use acad_core::enums::Role;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AccountCommands;
use crate::commands::shared::actor::require_admin;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    action: &AccountCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    require_admin(ctx, "create accounts")?;
    let new = build_new_account(action)?;
    let account = ctx.service.create_account(&new).await?;
    output(&account, flags.format)
}

fn build_new_account(action: &AccountCommands) -> anyhow::Result<NewAccount> {
    let AccountCommands::Create {
        unique_id,
        role,
        first_name,
        last_name,
        email,
        mat_number,
        level,
    } = action
    else {
        anyhow::bail!("expected `account create`");
    };

    let role: Role = parse_enum(role, "role")?;
    if role != Role::Student && *level != 0 {
        anyhow::bail!("--level only applies to students");
    }

    Ok(NewAccount {
        unique_id: unique_id.clone(),
        role,
        first_name: first_name.clone(),
        last_name: last_name.clone(),
        email: email.clone(),
        mat_number: mat_number.clone(),
        level: *level,
    })
}
