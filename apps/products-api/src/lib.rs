//! Products API - REST server over Postgres or an in-memory store

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

use axum::Router;
use axum_helpers::{create_router, health_router};

use state::AppState;

/// Assemble the full application router.
///
/// API routes go through the error-wrapping middleware; the health and
/// readiness probes are merged afterwards and answer unwrapped.
pub fn build_app(state: &AppState) -> Router {
    let config = &state.config;

    create_router::<openapi::ApiDoc>(
        api::routes(state),
        config.environment,
        config.validation_format,
    )
    .merge(health_router(config.app))
    .merge(api::health::router(state.clone()))
}
