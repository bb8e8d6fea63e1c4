//! Shared data models for the JobTrack backend.
//!
//! Entities, request/response DTOs, and the closed enums (roles, application
//! statuses) used by both the store and the API crates.

pub mod admin;
pub mod job;
pub mod role;
pub mod user;

pub use admin::{Admin, AdminResponse};
pub use job::{ApplicationStatus, Job, JobRequest, JobResponse, ParseStatusError};
pub use role::{ParseRoleError, Role};
pub use user::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest, User,
    UserResponse,
};
