//! Axum HTTP server turning uploaded videos into GIFs.
//!
//! This crate provides:
//! - The upload form and the upload/convert/render pipeline
//! - Deferred deletion of request artifacts
//! - Request ID and logging middleware
//! - Prometheus metrics and health probes

pub mod cleanup;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod state;

pub use cleanup::{CleanupScheduler, CleanupTask};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
