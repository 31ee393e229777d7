//! Application state management

use database::RetryConfig;
use domain_products::{InMemoryProductOptionRepository, InMemoryProductRepository};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::{Config, StoreConfig};

/// Handle on the backing store, shared by every request
#[derive(Clone)]
pub enum Store {
    InMemory {
        products: InMemoryProductRepository,
        options: InMemoryProductOptionRepository,
    },
    Postgres {
        db: DatabaseConnection,
        retry: RetryConfig,
    },
}

impl Store {
    /// An empty in-memory store
    pub fn in_memory() -> Self {
        Store::InMemory {
            products: InMemoryProductRepository::new(),
            options: InMemoryProductOptionRepository::new(),
        }
    }

    /// Name reported by the readiness probe
    pub fn kind(&self) -> &'static str {
        match self {
            Store::InMemory { .. } => "memory",
            Store::Postgres { .. } => "postgres",
        }
    }

    /// Release the store's resources. Called once on shutdown.
    pub async fn close(self) {
        if let Store::Postgres { db, .. } = self {
            info!("Shutting down: closing PostgreSQL connections");
            match db.close().await {
                Ok(()) => info!("PostgreSQL connection closed"),
                Err(e) => tracing::warn!("Failed to close PostgreSQL connections: {}", e),
            }
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Store,
}

impl AppState {
    /// Open the configured store, creating tables first if asked to.
    pub async fn connect(config: Config) -> eyre::Result<Self> {
        let store = match &config.store {
            StoreConfig::InMemory => {
                info!("Using the in-memory store");
                Store::in_memory()
            }
            StoreConfig::Postgres {
                postgres,
                retry,
                ensure_schema,
            } => {
                info!("Connecting to PostgreSQL");
                let db = database::postgres::connect_from_config_with_retry(
                    postgres.clone(),
                    retry.clone(),
                )
                .await?;

                if *ensure_schema {
                    domain_products::schema::create_tables(&db).await?;
                }

                Store::Postgres {
                    db,
                    retry: retry.clone(),
                }
            }
        };

        Ok(Self { config, store })
    }
}
