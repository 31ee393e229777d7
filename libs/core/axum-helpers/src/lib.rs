//! # Axum Helpers
//!
//! Shared building blocks for the HTTP surface.
//!
//! - **[`errors`]**: [`AppError`] and the JSON error envelopes
//! - **[`middleware`]**: error-wrapping response shaping
//! - **[`extractors`]**: UUID path and JSON body extractors
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown
//!
//! ```ignore
//! use axum_helpers::{ValidationBodyFormat, create_production_app, create_router};
//!
//! let router = create_router::<ApiDoc>(api_routes, environment, ValidationBodyFormat::Legacy);
//! create_production_app(router, &server_config, Duration::from_secs(30), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod middleware;
pub mod server;

pub use errors::{
    AppError, ErrorResponse, ExceptionResponse, StatusErrorResponse, ValidationBodyFormat,
    ValidationFailure,
};
pub use extractors::{JsonBody, KeyPath, UuidPath, UuidPathPair};
pub use server::{
    HealthResponse, ReadyResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, readiness,
};
