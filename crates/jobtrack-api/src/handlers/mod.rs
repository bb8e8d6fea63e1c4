//! HTTP handlers for the three resource collections.
//!
//! Handlers on protected routes receive the caller's [`Identity`] from the
//! authentication gate; handlers on public routes never assume one exists.
//!
//! [`Identity`]: crate::auth::Identity

pub mod admin;
pub mod jobs;
pub mod users;

use serde::Serialize;

use jobtrack_models::{JobResponse, UserResponse};

/// Envelope for mutations that return no resource.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Envelope for mutations that return the affected user.
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

impl UserEnvelope {
    pub fn ok(message: impl Into<String>, user: UserResponse) -> Self {
        Self {
            success: true,
            message: message.into(),
            user,
        }
    }
}

/// Envelope for mutations that return the affected job.
#[derive(Debug, Serialize)]
pub struct JobEnvelope {
    pub success: bool,
    pub message: String,
    pub job: JobResponse,
}

impl JobEnvelope {
    pub fn ok(message: impl Into<String>, job: JobResponse) -> Self {
        Self {
            success: true,
            message: message.into(),
            job,
        }
    }
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl HealthResponse {
    pub fn up(message: &'static str) -> Self {
        Self {
            status: "UP",
            message,
        }
    }
}
