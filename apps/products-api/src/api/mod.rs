//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Routes wrapped by the error-wrapping middleware
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/products", products::router(state))
}
