//! Axum HTTP API server for the job application tracker.
//!
//! This crate provides:
//! - HMAC-signed bearer token issuing and validation
//! - A path-based authentication gate over the `/api` namespace
//! - User, job application, and administration endpoints

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
