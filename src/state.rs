use crate::catalog::{CatalogStore, InMemoryCatalog, PgCatalogStore};
use crate::config::AppConfig;
use crate::planner::PlanGenerator;
use crate::plans::{InMemoryPlanStore, PgPlanStore, PlanStore};
use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn CatalogStore>,
    pub plans: Arc<dyn PlanStore>,
    pub generator: PlanGenerator,
}

impl AppState {
    /// Connects to Postgres and returns the pool alongside the state so the
    /// caller can run migrations on it.
    pub async fn init() -> anyhow::Result<(Self, PgPool)> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let catalog = Arc::new(PgCatalogStore::new(db.clone())) as Arc<dyn CatalogStore>;
        let plans = Arc::new(PgPlanStore::new(db.clone())) as Arc<dyn PlanStore>;
        Ok((Self::from_parts(config, catalog, plans), db))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        catalog: Arc<dyn CatalogStore>,
        plans: Arc<dyn PlanStore>,
    ) -> Self {
        let generator = PlanGenerator::from_config(&config.planner);
        Self {
            config,
            catalog,
            plans,
            generator,
        }
    }

    /// State backed by in-memory stores sharing one catalog.
    pub fn in_memory(config: AppConfig, catalog: InMemoryCatalog) -> Self {
        let catalog = Arc::new(catalog) as Arc<dyn CatalogStore>;
        let plans = Arc::new(InMemoryPlanStore::new(catalog.clone())) as Arc<dyn PlanStore>;
        Self::from_parts(Arc::new(config), catalog, plans)
    }
}
