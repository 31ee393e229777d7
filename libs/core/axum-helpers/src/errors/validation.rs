//! Field-level validation failures and their wire formats.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// One failed rule on one field of a request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    /// PascalCase field name, e.g. `DeliveryPrice`
    pub property_name: String,
    pub error_message: String,
    /// The rejected value as received
    #[schema(value_type = Object)]
    pub attempted_value: serde_json::Value,
}

impl ValidationFailure {
    pub fn new(
        property_name: impl Into<String>,
        error_message: impl Into<String>,
        attempted_value: serde_json::Value,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            error_message: error_message.into(),
            attempted_value,
        }
    }
}

/// How a 400 validation body is written.
///
/// `Legacy` concatenates one JSON object per failure with no separator, so a
/// body with two or more failures is not a single JSON document. `Array`
/// writes a JSON array of the same objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ValidationBodyFormat {
    #[default]
    Legacy,
    Array,
}

/// Response extension carrying the failures behind a 400 body, so the body can
/// be re-rendered in another format downstream.
#[derive(Debug, Clone)]
pub struct ValidationFailures(pub Vec<ValidationFailure>);

/// Build a 400 response for `failures` in the given format.
pub fn validation_response(failures: &[ValidationFailure], format: ValidationBodyFormat) -> Response {
    match format {
        ValidationBodyFormat::Legacy => {
            let body: String = failures
                .iter()
                .filter_map(|failure| serde_json::to_string(failure).ok())
                .collect();

            (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                body,
            )
                .into_response()
        }
        ValidationBodyFormat::Array => (StatusCode::BAD_REQUEST, Json(failures)).into_response(),
    }
}
