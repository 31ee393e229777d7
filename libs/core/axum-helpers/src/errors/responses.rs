//! JSON envelopes written by [`AppError`](super::AppError) and the
//! error-wrapping middleware.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message used by every unhandled-fault envelope.
pub const FAULT_MESSAGE: &str = "An error occurred while processing the request.";

/// Body of 404 and malformed-request responses.
///
/// ```json
/// { "statusCode": 404, "message": "Product with id 4a35… not found" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
}

/// Body written in place of any response whose status is not 200, 400 or 404.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusErrorResponse {
    pub status_code: u16,
    /// `An error <StatusName> occurred while processing the request.`
    pub message: String,
    pub method: String,
    pub path: String,
}

/// Body of a 500 produced by a store failure or a panic.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionResponse {
    pub status_code: u16,
    pub message: String,
    pub exception_message: String,
}

impl ExceptionResponse {
    pub fn new(exception_message: impl Into<String>) -> Self {
        Self {
            status_code: 500,
            message: FAULT_MESSAGE.to_string(),
            exception_message: exception_message.into(),
        }
    }
}

/// Response extension marking a body that is already a fault envelope.
///
/// The error-wrapping middleware leaves such responses untouched.
#[derive(Debug, Clone, Copy)]
pub struct FaultEnvelope;
