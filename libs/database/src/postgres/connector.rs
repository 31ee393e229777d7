use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use tracing::info;

use super::PostgresConfig;
use crate::common::{RetryConfig, retry_with_backoff_if};

/// Connect using a PostgresConfig
pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    connect_with_options(config.into_connect_options()).await
}

/// Connect with custom connection options
pub async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    info!("Successfully connected to PostgreSQL database");
    Ok(db)
}

/// Connect from config, retrying transient connection failures
///
/// ```ignore
/// use database::postgres::{PostgresConfig, connect_from_config_with_retry};
/// use database::RetryConfig;
///
/// let config = PostgresConfig::from_env()?;
/// let db = connect_from_config_with_retry(config, RetryConfig::new().with_max_retries(5)).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry: RetryConfig,
) -> Result<DatabaseConnection, DbErr> {
    let options = config.into_connect_options();

    retry_with_backoff_if(
        || {
            let opts = options.clone();
            connect_with_options(opts)
        },
        retry,
        is_transient,
    )
    .await
}

/// Whether an error is worth retrying: pool exhaustion or a dropped connection.
///
/// Query, constraint and decode errors are permanent.
pub fn is_transient(err: &DbErr) -> bool {
    matches!(err, DbErr::ConnectionAcquire(_) | DbErr::Conn(_))
}

/// Create the table for `entity` unless it already exists
///
/// ```ignore
/// create_table_if_missing(&db, product::Entity).await?;
/// ```
pub async fn create_table_if_missing<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let table = entity.table_name();
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();

    db.execute_raw(backend.build(&stmt)).await?;
    info!(table, "Ensured table exists");
    Ok(())
}
