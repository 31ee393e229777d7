use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ValidationFailure};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product with id {0} not found")]
    NotFound(Uuid),

    #[error("Option with id {0} not found")]
    OptionNotFound(Uuid),

    #[error("Invalid payload: {} failure(s)", .0.len())]
    Validation(Vec<ValidationFailure>),

    #[error("Product with id {0} already exists")]
    AlreadyExists(Uuid),

    #[error("Option with id {0} already exists")]
    OptionAlreadyExists(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) | ProductError::OptionNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            ProductError::Validation(failures) => AppError::Validation(failures),
            ProductError::AlreadyExists(_) | ProductError::OptionAlreadyExists(_) => {
                AppError::Conflict(err.to_string())
            }
            ProductError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
