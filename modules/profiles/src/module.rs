use std::sync::Arc;

use async_trait::async_trait;
use modkit::{DbModule, Module, ModuleCtx, RestfulModule};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::ProfilesConfig;
use crate::contract::client::ProfilesApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::ProfilesLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::SeaOrmProfilesRepository;

pub const MODULE_NAME: &str = "profiles";

/// Profiles module: registration, profile and lawyer updates over SeaORM.
#[derive(Default)]
pub struct Profiles {
    // Read-mostly; swapped once during init.
    service: arc_swap::ArcSwapOption<Service>,
}

impl Profiles {
    fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("profiles service not initialized"))
    }

    /// In-process client for other modules. Available after `init`.
    pub fn client(&self) -> anyhow::Result<Arc<dyn ProfilesApi>> {
        Ok(Arc::new(ProfilesLocalClient::new(self.service()?)))
    }
}

#[async_trait]
impl Module for Profiles {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing profiles module");

        let cfg: ProfilesConfig = ctx.module_config()?;
        debug!(
            "Loaded profiles config: max_display_name_length={}, max_age={}",
            cfg.max_display_name_length, cfg.max_age
        );

        let db = ctx.db().ok_or_else(|| anyhow::anyhow!("DB required"))?;
        let repo = SeaOrmProfilesRepository::new(db);
        let service = Service::new(Arc::new(repo), ServiceConfig::from(&cfg));

        self.service.store(Some(Arc::new(service)));
        Ok(())
    }
}

#[async_trait]
impl DbModule for Profiles {
    async fn migrate(&self, db: &sea_orm::DatabaseConnection) -> anyhow::Result<()> {
        info!("Running profiles database migrations");
        Migrator::up(db, None).await?;
        info!("Profiles database migrations completed successfully");
        Ok(())
    }
}

impl RestfulModule for Profiles {
    fn register_rest(&self, _ctx: &ModuleCtx, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering profiles REST routes");
        let router = routes::register_routes(router, self.service()?)?;
        info!("Profiles REST routes registered successfully");
        Ok(router)
    }
}
