//! Products API routes

use axum::Router;
use domain_products::{handlers, PgProductOptionRepository, PgProductRepository, ProductService};

use crate::state::{AppState, Store};

/// Create the products router over the configured store
pub fn router(state: &AppState) -> Router {
    match &state.store {
        Store::InMemory { products, options } => {
            handlers::router(ProductService::new(products.clone(), options.clone()))
        }
        Store::Postgres { db, retry } => {
            let service = ProductService::new(
                PgProductRepository::new(db.clone(), retry.clone()),
                PgProductOptionRepository::new(db.clone(), retry.clone()),
            );
            handlers::router(service)
        }
    }
}
