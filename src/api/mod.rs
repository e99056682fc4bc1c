//! HTTP Surface
//!
//! Thin axum shell over the core pipeline: ingest, replay, liveness. All
//! domain errors are converted to HTTP responses in one place
//! ([`error::ApiError`]); handlers stay declarative.

mod error;
mod routes;
mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
