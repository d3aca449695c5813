//! HTTP API module for the PIAWE engine.
//!
//! This module exposes the calculation orchestrator and the jurisdiction
//! rule table over REST endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::PiaweRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
