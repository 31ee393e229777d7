//! Custom extractors for Axum handlers.

pub mod json_body;
pub mod path;

pub use json_body::JsonBody;
pub use path::{KeyPath, UuidPath, UuidPathPair};
