//! Uniform error shaping for every response leaving the API router.
//!
//! - 200, 400 and 404 pass through. A 400 that carries
//!   [`ValidationFailures`] is re-rendered when the array format is configured.
//! - A response flagged with [`FaultEnvelope`] passes through.
//! - Any other status keeps its status and headers but gets a
//!   [`StatusErrorResponse`] body in place of whatever it had.
//! - A panic in the inner pipeline becomes a 500
//!   [`ExceptionResponse`](crate::errors::ExceptionResponse).
//!
//! ```ignore
//! let app = Router::new()
//!     .merge(api_routes)
//!     .layer(middleware::from_fn_with_state(ValidationBodyFormat::Array, error_wrapping));
//! ```

use crate::errors::{
    AppError, FaultEnvelope, StatusErrorResponse, ValidationBodyFormat, ValidationFailures,
    validation_response,
};
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{error, warn};

pub async fn error_wrapping(
    State(format): State<ValidationBodyFormat>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => shape_response(response, format, &method, &path),
        Err(panic) => {
            error!(%method, %path, "Unhandled fault while processing request");
            AppError::Internal(panic_message(panic.as_ref())).into_response()
        }
    }
}

fn shape_response(
    mut response: Response,
    format: ValidationBodyFormat,
    method: &Method,
    path: &str,
) -> Response {
    let status = response.status();

    if status == StatusCode::BAD_REQUEST {
        if format == ValidationBodyFormat::Array {
            if let Some(ValidationFailures(failures)) =
                response.extensions_mut().remove::<ValidationFailures>()
            {
                return validation_response(&failures, format);
            }
        }
        return response;
    }

    if status == StatusCode::OK
        || status == StatusCode::NOT_FOUND
        || response.extensions().get::<FaultEnvelope>().is_some()
    {
        return response;
    }

    warn!(%method, path, status = status.as_u16(), "Wrapping error response");

    let envelope = StatusErrorResponse {
        status_code: status.as_u16(),
        message: status_error_message(status),
        method: method.to_string(),
        path: path.to_owned(),
    };

    let (mut parts, _) = response.into_parts();
    let (_, body) = Json(envelope).into_response().into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, body)
}

/// `An error <StatusName> occurred while processing the request.`, where the
/// status name is the reason phrase without spaces (`MethodNotAllowed`).
pub fn status_error_message(status: StatusCode) -> String {
    let name = status
        .canonical_reason()
        .map(|reason| reason.chars().filter(|c| c.is_ascii_alphanumeric()).collect())
        .unwrap_or_else(|| status.as_u16().to_string());

    format!("An error {} occurred while processing the request.", name)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unknown panic".to_string()
    }
}
