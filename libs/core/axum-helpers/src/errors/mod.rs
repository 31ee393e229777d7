pub mod handlers;
pub mod responses;
pub mod validation;

pub use responses::{
    ErrorResponse, ExceptionResponse, FAULT_MESSAGE, FaultEnvelope, StatusErrorResponse,
};
pub use validation::{
    ValidationBodyFormat, ValidationFailure, ValidationFailures, validation_response,
};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

/// Application error type that can be converted to HTTP responses.
///
/// | Variant | Status | Body |
/// |---|---|---|
/// | `NotFound`, `BadRequest`, `JsonExtractorRejection` | 404 / 400 | [`ErrorResponse`] |
/// | `Validation` | 400 | concatenated [`ValidationFailure`] objects |
/// | `Conflict` | 409 | empty, shaped by the error-wrapping middleware |
/// | `Database`, `Internal` | 500 | [`ExceptionResponse`] |
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<ValidationFailure>),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    Database(#[from] DbErr),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(message) => {
                tracing::warn!("{}", message);
                message_response(StatusCode::NOT_FOUND, message)
            }
            AppError::Validation(failures) => {
                tracing::error!(failures = failures.len(), "Request payload invalid");
                let mut response = validation_response(&failures, ValidationBodyFormat::Legacy);
                response
                    .extensions_mut()
                    .insert(ValidationFailures(failures));
                response
            }
            AppError::BadRequest(message) => {
                tracing::info!("Bad request: {}", message);
                message_response(StatusCode::BAD_REQUEST, message)
            }
            AppError::JsonExtractorRejection(rejection) => {
                tracing::warn!("JSON extraction error: {:?}", rejection);
                message_response(StatusCode::BAD_REQUEST, rejection.body_text())
            }
            AppError::Conflict(message) => {
                tracing::info!("Conflict: {}", message);
                StatusCode::CONFLICT.into_response()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                fault_response(e.to_string())
            }
            AppError::Internal(message) => {
                tracing::error!("Internal server error: {}", message);
                fault_response(message)
            }
        }
    }
}

fn message_response(status: StatusCode, message: String) -> Response {
    let body = ErrorResponse {
        status_code: status.as_u16(),
        message,
    };
    (status, Json(body)).into_response()
}

/// 500 with the fault envelope, flagged so the middleware passes it through.
fn fault_response(exception_message: impl Into<String>) -> Response {
    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ExceptionResponse::new(exception_message)),
    )
        .into_response();
    response.extensions_mut().insert(FaultEnvelope);
    response
}
