//! Readiness endpoint
//!
//! Liveness (`/health`) comes from `axum_helpers::health_router`.

use axum::{extract::State, response::Response, routing::get, Router};
use axum_helpers::readiness;
use std::convert::Infallible;

use crate::state::{AppState, Store};

async fn ready(State(state): State<AppState>) -> Response {
    match &state.store {
        Store::InMemory { .. } => readiness::<Infallible>(state.store.kind(), Ok(())),
        Store::Postgres { db, .. } => {
            readiness(state.store.kind(), database::postgres::check_health(db).await)
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(state)
}
