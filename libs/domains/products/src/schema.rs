//! Table creation for a fresh database.
//!
//! Creates missing tables from the entity definitions. Existing tables are
//! left as they are; there is no versioning.

use database::postgres::create_table_if_missing;
use sea_orm::{DatabaseConnection, DbErr};

use crate::entity::{product, product_option};

/// Create the `product` and `product_option` tables if they do not exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table_if_missing(db, product::Entity).await?;
    create_table_if_missing(db, product_option::Entity).await?;
    Ok(())
}
