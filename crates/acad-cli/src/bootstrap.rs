use anyhow::Context;

use acad_config::AcadConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<AcadConfig> {
    let mut config = AcadConfig::load_with_dotenv().context("failed to load acad configuration")?;
    apply_overrides(&mut config, flags)?;
    Ok(config)
}

fn apply_overrides(config: &mut AcadConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(path) = &flags.db {
        config.database.path.clone_from(path);
        config
            .validate()
            .context("invalid --db override")?;
    }
    Ok(())
}
