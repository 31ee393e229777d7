use async_trait::async_trait;
use database::RetryConfig;
use database::postgres::is_transient;
use database::retry_with_backoff_if;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
};
use std::future::Future;
use uuid::Uuid;

use crate::{
    entity::{product, product_option},
    error::{ProductError, ProductResult},
    models::{Product, ProductOption},
    repository::{ProductOptionRepository, ProductRepository},
};

/// Run a store operation under the retry policy, retrying only transient
/// connection failures.
async fn with_retry<T, F, Fut>(retry: &RetryConfig, operation: F) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    retry_with_backoff_if(operation, retry.clone(), is_transient).await
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub struct PgProductRepository {
    db: DatabaseConnection,
    retry: RetryConfig,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection, retry: RetryConfig) -> Self {
        Self { db, retry }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        let models = with_retry(&self.retry, || product::Entity::find().all(&self.db)).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let model = with_retry(&self.retry, || {
            product::Entity::find_by_id(id).one(&self.db)
        })
        .await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_name(&self, name: &str) -> ProductResult<Vec<Product>> {
        let pattern = format!("%{}%", name.to_lowercase());

        let models = with_retry(&self.retry, || {
            product::Entity::find()
                .filter(Expr::cust_with_values(
                    r#"LOWER("name") LIKE ?"#,
                    [pattern.clone()],
                ))
                .all(&self.db)
        })
        .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, product: Product) -> ProductResult<Product> {
        let id = product.id;
        let active: product::ActiveModel = product.into();

        // Not retried: a commit whose reply was lost would come back as a
        // unique violation on the second attempt.
        let model = active.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                ProductError::AlreadyExists(id)
            } else {
                ProductError::Database(e)
            }
        })?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into())
    }

    async fn save(&self, product: &Product) -> ProductResult<u64> {
        let columns = product::update_columns(product);

        let result = with_retry(&self.retry, || {
            product::Entity::update_many()
                .set(columns.clone())
                .filter(product::Column::Id.eq(product.id))
                .exec(&self.db)
        })
        .await?;

        tracing::info!(product_id = %product.id, rows = result.rows_affected, "Updated product");
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = with_retry(&self.retry, || {
            product::Entity::delete_by_id(id).exec(&self.db)
        })
        .await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

pub struct PgProductOptionRepository {
    db: DatabaseConnection,
    retry: RetryConfig,
}

impl PgProductOptionRepository {
    pub fn new(db: DatabaseConnection, retry: RetryConfig) -> Self {
        Self { db, retry }
    }
}

#[async_trait]
impl ProductOptionRepository for PgProductOptionRepository {
    async fn get_all(&self) -> ProductResult<Vec<ProductOption>> {
        let models =
            with_retry(&self.retry, || product_option::Entity::find().all(&self.db)).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<ProductOption>> {
        let model = with_retry(&self.retry, || {
            product_option::Entity::find_by_id(id).one(&self.db)
        })
        .await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_product_id(&self, product_id: Uuid) -> ProductResult<Vec<ProductOption>> {
        let models = with_retry(&self.retry, || {
            product_option::Entity::find()
                .filter(product_option::Column::ProductId.eq(product_id))
                .all(&self.db)
        })
        .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, option: ProductOption) -> ProductResult<ProductOption> {
        let id = option.id;
        let active: product_option::ActiveModel = option.into();

        // Not retried, see `PgProductRepository::insert`.
        let model = active.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                ProductError::OptionAlreadyExists(id)
            } else {
                ProductError::Database(e)
            }
        })?;

        tracing::info!(option_id = %model.id, product_id = %model.product_id, "Created option");
        Ok(model.into())
    }

    async fn save(&self, option: &ProductOption) -> ProductResult<u64> {
        let columns = product_option::update_columns(option);

        let result = with_retry(&self.retry, || {
            product_option::Entity::update_many()
                .set(columns.clone())
                .filter(product_option::Column::Id.eq(option.id))
                .exec(&self.db)
        })
        .await?;

        tracing::info!(option_id = %option.id, rows = result.rows_affected, "Updated option");
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = with_retry(&self.retry, || {
            product_option::Entity::delete_by_id(id).exec(&self.db)
        })
        .await?;

        if result.rows_affected > 0 {
            tracing::info!(option_id = %id, "Deleted option");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, RuntimeErr};

    fn product_model(name: &str) -> product::Model {
        product::Model {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            description: Some(format!("{} description", name)),
            price: 10.0,
            delivery_price: 1.5,
        }
    }

    fn no_retry() -> RetryConfig {
        RetryConfig::disabled()
    }

    #[tokio::test]
    async fn test_get_all_maps_models() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product_model("Product1"), product_model("Product2")]])
            .into_connection();

        let repo = PgProductRepository::new(db, no_retry());
        let products = repo.get_all().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name.as_deref(), Some("Product1"));
        assert_eq!(products[1].delivery_price, 1.5);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();

        let repo = PgProductRepository::new(db, no_retry());
        assert_eq!(repo.get_by_id(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_by_name_lowercases_pattern() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product_model("Product1")]])
            .into_connection();

        let repo = PgProductRepository::new(db, no_retry());
        let found = repo.get_by_name("DUCT1").await.unwrap();
        assert_eq!(found.len(), 1);

        let log = repo.db.into_transaction_log();
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("LOWER"));
        assert!(sql.contains("%duct1%"));
    }

    #[tokio::test]
    async fn test_get_by_name_passes_wildcards_through() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product_model("Product1")]])
            .into_connection();

        let repo = PgProductRepository::new(db, no_retry());
        repo.get_by_name("Prod%1_").await.unwrap();

        let sql = format!("{:?}", repo.db.into_transaction_log()[0]);
        assert!(sql.contains("%prod%1_%"));
    }

    #[tokio::test]
    async fn test_insert_is_not_retried() {
        let model = product_model("Product1");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Conn(RuntimeErr::Internal("reset".to_string()))])
            .append_query_results([vec![model.clone()]])
            .into_connection();

        let retry = RetryConfig::new()
            .with_max_retries(2)
            .with_initial_delay(1)
            .without_jitter();
        let repo = PgProductRepository::new(db, retry);

        assert!(matches!(
            repo.insert(model.into()).await,
            Err(ProductError::Database(DbErr::Conn(_)))
        ));
    }

    #[tokio::test]
    async fn test_save_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = PgProductRepository::new(db, no_retry());
        let product: Product = product_model("Product1").into();

        assert_eq!(repo.save(&product).await.unwrap(), 1);
        assert_eq!(repo.save(&product).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_option() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = PgProductOptionRepository::new(db, no_retry());
        let id = Uuid::new_v4();

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_options_by_product_filters_on_owner() {
        let owner = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product_option::Model {
                id: Uuid::new_v4(),
                product_id: owner,
                name: Some("Red".to_string()),
                description: None,
            }]])
            .into_connection();

        let repo = PgProductOptionRepository::new(db, no_retry());
        let options = repo.get_by_product_id(owner).await.unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].product_id, owner);

        let sql = format!("{:?}", repo.db.into_transaction_log()[0]);
        assert!(sql.contains("product_id"));
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Conn(RuntimeErr::Internal("reset".to_string()))])
            .append_query_results([vec![product_model("Product1")]])
            .into_connection();

        let retry = RetryConfig::new()
            .with_max_retries(2)
            .with_initial_delay(1)
            .without_jitter();
        let repo = PgProductRepository::new(db, retry);

        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("syntax error".to_string())])
            .append_query_results([vec![product_model("Product1")]])
            .into_connection();

        let retry = RetryConfig::new().with_initial_delay(1).without_jitter();
        let repo = PgProductRepository::new(db, retry);

        assert!(matches!(
            repo.get_all().await,
            Err(ProductError::Database(DbErr::Custom(_)))
        ));
    }
}
