use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use core_config::AppInfo;
use serde::{Deserialize, Serialize};

/// Liveness body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
}

/// Readiness body. `store` names the backing store that was checked.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness handler: 200 whenever the process is serving.
pub async fn health_handler(State(app): State<AppInfo>) -> Response {
    let response = HealthResponse {
        status: "healthy".to_string(),
        name: app.name.to_string(),
        version: app.version.to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Creates a router with the /health endpoint.
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info)
}

/// Turn a store check result into a readiness response: 200 when it passed,
/// 503 otherwise.
pub fn readiness<E: std::fmt::Display>(store: &str, check: Result<(), E>) -> Response {
    match check {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                store: store.to_string(),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Readiness check failed: {} error: {}", store, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    ready: false,
                    store: store.to_string(),
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}
