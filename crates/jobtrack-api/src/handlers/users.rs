//! User account handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;
use validator::Validate;

use jobtrack_models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, Role, UpdateUserRequest,
    UserResponse,
};
use jobtrack_store::users::NewUser;

use crate::auth::{password, Identity};
use crate::error::{ApiError, ApiResult};
use crate::handlers::{HealthResponse, MessageResponse, UserEnvelope};
use crate::state::AppState;

/// Register a new user account.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserEnvelope>)> {
    request.validate()?;

    if state.users.exists_by_email(&request.email).await {
        return Err(ApiError::field("email", "Email already exists"));
    }

    let password_hash = password::hash(&request.password)?;
    let user = state
        .users
        .insert(NewUser {
            name: request.name,
            email: request.email,
            password_hash,
            role: Role::User,
        })
        .await;

    info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope::ok(
            "User registered successfully",
            UserResponse::from(&user),
        )),
    ))
}

/// Log in and obtain a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let mut user = state
        .users
        .get_by_email(&request.email)
        .await
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    if !password::verify(&request.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }
    if !user.is_active {
        return Err(ApiError::unauthorized("Account is deactivated"));
    }

    user.last_login = Some(Utc::now());
    let user = state
        .users
        .save(user)
        .await
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let token = state
        .codec
        .issue(user.id, &user.email, user.role, Utc::now().timestamp());

    info!(user_id = user.id, "user logged in");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token: Some(token),
        user: Some(UserResponse::from(&user)),
    }))
}

/// List all users.
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserResponse>> {
    let users = state.users.list().await;
    Json(users.iter().map(UserResponse::from).collect())
}

/// Get a user by id.
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

/// Get a user by email.
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .get_by_email(&email)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with email: {email}")))?;
    Ok(Json(UserResponse::from(&user)))
}

/// Get the calling user's own profile, scoped by the gate-provided identity.
pub async fn profile(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .get(identity.user_id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {}", identity.user_id)))?;
    Ok(Json(UserResponse::from(&user)))
}

/// Update a user's profile fields.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserEnvelope>> {
    let mut user = state
        .users
        .get(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {id}")))?;

    if let Some(name) = request.name {
        user.name = name;
    }

    let user = state
        .users
        .save(user)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {id}")))?;

    Ok(Json(UserEnvelope::ok(
        "Profile updated successfully",
        UserResponse::from(&user),
    )))
}

/// Change a user's password after verifying the old one.
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let mut user = state
        .users
        .get(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {id}")))?;

    if !password::verify(&request.old_password, &user.password_hash) {
        return Err(ApiError::bad_request("Old password is incorrect"));
    }

    user.password_hash = password::hash(&request.new_password)?;
    state
        .users
        .save(user)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {id}")))?;

    Ok(Json(MessageResponse::ok("Password changed successfully")))
}

/// Deactivate a user account.
pub async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserEnvelope>> {
    let mut user = state
        .users
        .get(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {id}")))?;

    user.is_active = false;
    let user = state
        .users
        .save(user)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {id}")))?;

    Ok(Json(UserEnvelope::ok(
        "Account deactivated successfully",
        UserResponse::from(&user),
    )))
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
    info!(user_id = id, jobs_removed = removed, "user deleted");

    Ok(Json(MessageResponse::ok("User deleted successfully")))
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::up("User service is running"))
}
