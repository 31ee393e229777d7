//! Payload validation producing field-ordered [`ValidationFailure`] lists.

use axum_helpers::ValidationFailure;
use serde_json::{Value, json};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{Product, ProductOption};

/// Rejects the nil UUID.
pub fn validate_id(id: &Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        let mut error = ValidationError::new("required");
        error.message = Some("Id is required.".into());
        return Err(error);
    }
    Ok(())
}

/// Rejects empty and whitespace-only names.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("Name is required.".into());
        return Err(error);
    }
    Ok(())
}

/// A payload whose `validator` errors can be reported in a stable order.
pub trait Validated: Validate {
    /// Validated fields, in reporting order.
    const FIELDS: &'static [&'static str];

    /// The value of `field` as it was received.
    fn attempted_value(&self, field: &str) -> Value;

    /// All failures, ordered by [`Self::FIELDS`]. Empty when valid.
    fn validation_failures(&self) -> Vec<ValidationFailure> {
        let Err(errors) = self.validate() else {
            return Vec::new();
        };
        let field_errors = errors.field_errors();

        Self::FIELDS
            .iter()
            .filter_map(|field| field_errors.get(*field).map(|errs| (*field, errs)))
            .flat_map(|(field, errs)| {
                errs.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    ValidationFailure::new(
                        property_name(field),
                        message,
                        self.attempted_value(field),
                    )
                })
            })
            .collect()
    }
}

impl Validated for Product {
    const FIELDS: &'static [&'static str] = &["id", "name", "price", "delivery_price"];

    fn attempted_value(&self, field: &str) -> Value {
        match field {
            "id" => json!(self.id),
            "name" => json!(self.name),
            "price" => json!(self.price),
            "delivery_price" => json!(self.delivery_price),
            _ => Value::Null,
        }
    }
}

impl Validated for ProductOption {
    const FIELDS: &'static [&'static str] = &["id", "name"];

    fn attempted_value(&self, field: &str) -> Value {
        match field {
            "id" => json!(self.id),
            "name" => json!(self.name),
            _ => Value::Null,
        }
    }
}

/// `delivery_price` -> `DeliveryPrice`
fn property_name(field: &str) -> String {
    field
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
