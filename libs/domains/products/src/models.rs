use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_id, validate_name};

/// A catalog product.
///
/// Every field defaults when absent from a request body, so that missing
/// values surface as validation failures rather than parse errors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    #[validate(custom(function = "validate_id"))]
    pub id: Uuid,

    #[serde(default)]
    #[validate(
        required(message = "Name is required."),
        custom(function = "validate_name")
    )]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "Price must be positive."))]
    pub price: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "Delivery price must be positive."))]
    pub delivery_price: f64,
}

impl Product {
    /// Copy the mutable fields of `other` onto `self`. The id is kept.
    pub fn apply_update(&mut self, other: Product) {
        self.name = other.name;
        self.description = other.description;
        self.price = other.price;
        self.delivery_price = other.delivery_price;
    }
}

/// An option (variant) belonging to a product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    #[serde(default)]
    #[validate(custom(function = "validate_id"))]
    pub id: Uuid,

    /// Owning product. Taken from the route on create.
    #[serde(default)]
    pub product_id: Uuid,

    #[serde(default)]
    #[validate(
        required(message = "Name is required."),
        custom(function = "validate_name")
    )]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl ProductOption {
    /// Copy the mutable fields of `other` onto `self`. Id and owner are kept.
    pub fn apply_update(&mut self, other: ProductOption) {
        self.name = other.name;
        self.description = other.description;
    }
}

/// Product list wrapper: `{"items": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Products {
    pub items: Vec<Product>,
}

impl From<Vec<Product>> for Products {
    fn from(items: Vec<Product>) -> Self {
        Self { items }
    }
}

/// Option list wrapper: `{"items": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProductOptions {
    pub items: Vec<ProductOption>,
}

impl From<Vec<ProductOption>> for ProductOptions {
    fn from(items: Vec<ProductOption>) -> Self {
        Self { items }
    }
}
