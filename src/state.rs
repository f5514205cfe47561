use std::sync::Arc;

use tracing::info;

use crate::config::{AppConfig, StoreBackend};
use crate::store::{MemoryStore, NutritionStore, PgStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NutritionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn NutritionStore> = match (&config.backend, &config.database) {
            (StoreBackend::Postgres, Some(db)) => {
                let pg = PgStore::connect(&db.url, db.max_connections).await?;
                if db.run_migrations {
                    pg.migrate().await?;
                }
                info!(max_connections = db.max_connections, "postgres store ready");
                Arc::new(pg)
            }
            (StoreBackend::Postgres, None) => anyhow::bail!("postgres backend without database config"),
            (StoreBackend::Memory, _) => {
                info!("memory store ready; data is lost on exit");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn NutritionStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// State backed by an empty memory store.
    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            backend: StoreBackend::Memory,
            database: None,
        });
        Self::from_parts(Arc::new(MemoryStore::new()), config)
    }
}
