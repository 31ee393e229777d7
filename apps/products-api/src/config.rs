//! Configuration for Products API

use axum_helpers::ValidationBodyFormat;
use core_config::{app_info, env_parse, server::ServerConfig, AppInfo, ConfigError, FromEnv};
use database::postgres::PostgresConfig;
use database::RetryConfig;

pub use core_config::Environment;

/// Where products are kept
#[derive(Clone, Debug)]
pub enum StoreConfig {
    /// Ephemeral in-memory store, selected by the isolated environment
    InMemory,
    Postgres {
        postgres: PostgresConfig,
        retry: RetryConfig,
        /// Create missing tables at startup
        ensure_schema: bool,
    },
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub store: StoreConfig,
    pub validation_format: ValidationBodyFormat,
}

impl Config {
    /// Load from the environment.
    ///
    /// `DATABASE_URL` is only required outside the isolated environment.
    /// Store operations are retried only in production unless
    /// `DB_RETRY_MAX_RETRIES` says otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;

        let store = if environment.is_isolated() {
            StoreConfig::InMemory
        } else {
            let default_retries = if environment.is_production() { "3" } else { "0" };
            let mut retry = RetryConfig::from_env()?;
            retry.max_retries = env_parse("DB_RETRY_MAX_RETRIES", default_retries)?;

            StoreConfig::Postgres {
                postgres: PostgresConfig::from_env()?,
                retry,
                ensure_schema: env_parse("DB_ENSURE_SCHEMA", "true")?,
            }
        };

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            store,
            validation_format: env_parse("VALIDATION_ERRORS_FORMAT", "legacy")?,
        })
    }

    /// Isolated-environment config with the given validation body format
    pub fn isolated(validation_format: ValidationBodyFormat) -> Self {
        Self {
            app: app_info!(),
            server: ServerConfig::default(),
            environment: Environment::Isolated,
            store: StoreConfig::InMemory,
            validation_format,
        }
    }
}
