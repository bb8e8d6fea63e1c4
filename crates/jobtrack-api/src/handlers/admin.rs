//! Administration handlers.
//!
//! All routes here except login and health sit in the admin namespace and are
//! reachable only with an ADMIN-role token; the gate enforces that before any
//! of these run.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use jobtrack_models::{AdminResponse, LoginRequest, LoginResponse, Role, UserResponse};

use crate::auth::password;
use crate::error::{ApiError, ApiResult};
use crate::handlers::{HealthResponse, MessageResponse, UserEnvelope};
use crate::state::AppState;

/// Log in against the administrator collection.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let mut admin = state
        .admins
        .get_by_email(&request.email)
        .await
        .ok_or_else(|| ApiError::unauthorized("Admin not found"))?;

    if !password::verify(&request.password, &admin.password_hash) {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }
    if !admin.is_active {
        return Err(ApiError::unauthorized("Account is deactivated"));
    }

    admin.last_login = Some(Utc::now());
    let admin = state
        .admins
        .save(admin)
        .await
        .ok_or_else(|| ApiError::not_found("Admin not found"))?;

    let token = state
        .codec
        .issue(admin.id, &admin.email, admin.role, Utc::now().timestamp());

    info!(admin_id = admin.id, "admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token: Some(token),
        user: Some(UserResponse::from(&admin)),
    }))
}

/// List all administrators.
pub async fn list_admins(State(state): State<AppState>) -> Json<Vec<AdminResponse>> {
    let admins = state.admins.list().await;
    Json(admins.iter().map(AdminResponse::from).collect())
}

/// List all regular users.
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserResponse>> {
    let users = state.users.list().await;
    Json(users.iter().map(UserResponse::from).collect())
}

/// Get a regular user by id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .get(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {id}")))?;
    Ok(Json(UserResponse::from(&user)))
}

/// Grant the ADMIN role to a regular user.
pub async fn make_admin(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserEnvelope>> {
    let user = set_role(&state, id, Role::Admin).await?;
    info!(user_id = id, "admin privileges granted");
    Ok(Json(UserEnvelope::ok(
        "User granted admin privileges",
        user,
    )))
}

/// Revoke the ADMIN role from a user.
pub async fn revoke_admin(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserEnvelope>> {
    let user = set_role(&state, id, Role::User).await?;
    info!(user_id = id, "admin privileges revoked");
    Ok(Json(UserEnvelope::ok("Admin privileges revoked", user)))
}

/// Activate a user account.
pub async fn activate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserEnvelope>> {
    let user = set_active(&state, id, true).await?;
    Ok(Json(UserEnvelope::ok("User account activated", user)))
}

/// Deactivate a user account.
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserEnvelope>> {
    let user = set_active(&state, id, false).await?;
    Ok(Json(UserEnvelope::ok("User account deactivated", user)))
}

/// Delete a user account along with its job entries.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.users.delete(id).await {
        return Err(ApiError::not_found(format!("User not found with id: {id}")));
    }
    let removed = state.jobs.delete_by_user(id).await;
    info!(user_id = id, jobs_removed = removed, "user deleted by admin");

    Ok(Json(MessageResponse::ok("User deleted successfully")))
}

/// System-wide statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub admin_users: u64,
    pub total_jobs: u64,
}

/// Aggregate user and job counts.
pub async fn statistics(State(state): State<AppState>) -> Json<AdminStats> {
    let users = state.users.list().await;
    let total_users = users.len() as u64;
    let active_users = users.iter().filter(|u| u.is_active).count() as u64;
    let admin_users = users.iter().filter(|u| u.role.is_admin()).count() as u64;

    Json(AdminStats {
        total_users,
        active_users,
        inactive_users: total_users - active_users,
        admin_users,
        total_jobs: state.jobs.count().await,
    })
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::up("Admin service is running"))
}

async fn set_role(state: &AppState, id: i64, role: Role) -> ApiResult<UserResponse> {
    let mut user = state
        .users
        .get(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {id}")))?;

    user.role = role;
    let user = state
        .users
        .save(user)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {id}")))?;
    Ok(UserResponse::from(&user))
}

async fn set_active(state: &AppState, id: i64, active: bool) -> ApiResult<UserResponse> {
    let mut user = state
        .users
        .get(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {id}")))?;

    user.is_active = active;
    let user = state
        .users
        .save(user)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {id}")))?;
    Ok(UserResponse::from(&user))
}
