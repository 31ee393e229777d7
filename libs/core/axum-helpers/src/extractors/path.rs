//! Path parameter extractors.
//!
//! A segment that does not parse as a UUID answers 404, as if the route did
//! not match. A segment that cannot be decoded at all answers 400 with the
//! [`ErrorResponse`](crate::errors::ErrorResponse) envelope.

use crate::errors::AppError;
use crate::errors::handlers::route_not_found;
use axum::{
    extract::{FromRequestParts, Path, rejection::PathRejection},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Extractor for a single path parameter taken as text.
///
/// ```ignore
/// async fn search(KeyPath(key): KeyPath) -> impl IntoResponse { ... }
///
/// let app = Router::new().route("/products/{key}", get(search));
/// ```
#[derive(Debug, Clone)]
pub struct KeyPath(pub String);

impl<S> FromRequestParts<S> for KeyPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(bad_path)?;

        Ok(KeyPath(raw))
    }
}

/// Extractor for a single UUID path parameter.
///
/// ```ignore
/// async fn delete_product(UuidPath(id): UuidPath) -> impl IntoResponse { ... }
///
/// let app = Router::new().route("/products/{id}", delete(delete_product));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(bad_path)?;

        parse(&raw).map(UuidPath)
    }
}

/// Extractor for two UUID path parameters, in route order.
///
/// ```ignore
/// async fn get_option(UuidPathPair(product_id, id): UuidPathPair) -> impl IntoResponse { ... }
///
/// let app = Router::new().route("/products/{id}/options/{option_id}", get(get_option));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UuidPathPair(pub Uuid, pub Uuid);

impl<S> FromRequestParts<S> for UuidPathPair
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((first, second)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(bad_path)?;

        Ok(UuidPathPair(parse(&first)?, parse(&second)?))
    }
}

fn bad_path(rejection: PathRejection) -> Response {
    AppError::BadRequest(rejection.body_text()).into_response()
}

fn parse(raw: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(raw).map_err(|_| {
        tracing::debug!(segment = raw, "Path segment is not a UUID");
        route_not_found()
    })
}
