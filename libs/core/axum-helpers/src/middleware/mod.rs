//! Request/response middleware.

pub mod error_wrapping;

pub use error_wrapping::{error_wrapping, status_error_message};
