use anyhow::Context;

use acad_config::AcadConfig;
use acad_core::identity::Actor;
use acad_db::service::AcadService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: AcadService,
    pub config: AcadConfig,
    pub actor: Actor,
}

impl AppContext {
    /// Open the record store, seed the root admin, and resolve the acting account.
    pub async fn init(config: AcadConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let service = AcadService::from_config(&config)
            .await
            .with_context(|| format!("failed to open record store at {}", config.database.path))?;
        let root = service
            .ensure_root_admin()
            .await
            .context("failed to seed root admin")?;

        let actor = match flags.actor.as_deref() {
            Some(unique_id) => service
                .resolve_actor(unique_id)
                .await
                .with_context(|| format!("cannot act as '{unique_id}'"))?,
            None => Actor::new(root.unique_id, root.role),
        };
        tracing::debug!(actor = %actor.unique_id, role = %actor.role, "acting account resolved");

        Ok(Self {
            service,
            config,
            actor,
        })
    }
}
