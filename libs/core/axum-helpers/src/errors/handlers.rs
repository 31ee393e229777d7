use axum::response::{IntoResponse, Response};

use super::AppError;

/// Message for requests that match no route.
pub const ROUTE_NOT_FOUND: &str = "The requested resource was not found";

/// Fallback handler for unmatched routes.
pub async fn not_found() -> Response {
    route_not_found()
}

/// 404 for a path that matches no route, including a `{id}` segment that is
/// not a UUID.
pub fn route_not_found() -> Response {
    AppError::NotFound(ROUTE_NOT_FOUND.to_string()).into_response()
}
