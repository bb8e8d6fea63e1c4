//! API integration tests.
//!
//! Exercises the router end to end through `tower::ServiceExt::oneshot`,
//! including the authentication gate in front of every protected route.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use jobtrack_api::{create_router, ApiConfig, AppState};
use jobtrack_models::Role;

const ADMIN_EMAIL: &str = "admin@jobtrack.local";
const ADMIN_PASSWORD: &str = "Admin1234";

async fn test_state() -> AppState {
    let config = ApiConfig {
        jwt_secret: "integration-test-secret".to_string(),
        admin_email: ADMIN_EMAIL.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        token_ttl: Duration::from_secs(3600),
        ..ApiConfig::default()
    };
    AppState::new(config).await.expect("app state")
}

async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    (create_router(state.clone()), state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user and return a valid token for them.
async fn register_and_login(app: &Router, email: &str) -> (i64, String) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/users/register",
            json!({"name": "Test User", "email": email, "password": "Passw0rd"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let user_id = body["user"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/users/login",
            json!({"email": email, "password": "Passw0rd"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap().to_string();

    (user_id, token)
}

#[tokio::test]
async fn test_health_endpoints_bypass_the_gate() {
    let (app, _) = test_app().await;

    for uri in [
        "/api/users/health",
        "/api/jobs/health",
        "/api/admin/health",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "health at {uri}");
        let body = body_json(response).await;
        assert_eq!(body["status"], "UP");
    }
}

#[tokio::test]
async fn test_preflight_is_never_challenged() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/admin/users")
                .header(header::ORIGIN, "https://app.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_authorization_header() {
    let (app, _) = test_app().await;

    let response = app.oneshot(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing or invalid authorization header");
    assert_eq!(body["status"], 401);
    assert!(body["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_rejected() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Missing or invalid authorization header");
}

#[tokio::test]
async fn test_garbage_token_gets_uniform_rejection() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(get_with_token("/api/users", "not.a.token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_tampered_token_gets_uniform_rejection() {
    let (app, state) = test_app().await;

    let token = state
        .codec
        .issue(1, "user@example.com", Role::User, chrono::Utc::now().timestamp());
    let mut tampered = token.into_bytes();
    let last = tampered.len() - 1;
    tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let response = app
        .oneshot(get_with_token("/api/users", &tampered))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_user_token_cannot_reach_admin_routes() {
    let (app, _) = test_app().await;
    let (_, token) = register_and_login(&app, "plain@example.com").await;

    let response = app
        .oneshot(get_with_token("/api/admin/users", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Admin access required");
}

#[tokio::test]
async fn test_admin_login_and_admin_routes() {
    let (app, _) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/admin/login",
            json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap().to_string();

    // The login response carries the admin principal, same shape as a user
    // login.
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);
    assert_eq!(body["user"]["role"], "ADMIN");
    assert!(body["user"]["id"].as_i64().unwrap() > 0);
    assert!(body["user"].get("passwordHash").is_none());

    let response = app
        .clone()
        .oneshot(get_with_token("/api/admin/statistics", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["totalUsers"], 0);
    assert_eq!(body["totalJobs"], 0);
}

#[tokio::test]
async fn test_admin_login_with_wrong_password() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(post_json(
            "/api/admin/login",
            json!({"email": ADMIN_EMAIL, "password": "wrong"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_profile_flow() {
    let (app, _) = test_app().await;
    let (user_id, token) = register_and_login(&app, "flow@example.com").await;

    let response = app
        .oneshot(get_with_token("/api/users/profile", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"].as_i64().unwrap(), user_id);
    assert_eq!(body["email"], "flow@example.com");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(post_json(
            "/api/users/register",
            json!({"name": "Weak", "email": "weak@example.com", "password": "short"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["errors"]["password"].is_string());
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let (app, _) = test_app().await;
    register_and_login(&app, "dup@example.com").await;

    let response = app
        .oneshot(post_json(
            "/api/users/register",
            json!({"name": "Dup", "email": "dup@example.com", "password": "Passw0rd"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"]["email"], "Email already exists");
}

#[tokio::test]
async fn test_deactivated_account_cannot_log_in() {
    let (app, _) = test_app().await;
    let (user_id, token) = register_and_login(&app, "inactive@example.com").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri(format!("/api/users/{user_id}/deactivate"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json(
            "/api/users/login",
            json!({"email": "inactive@example.com", "password": "Passw0rd"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Account is deactivated");
}

#[tokio::test]
async fn test_job_crud_and_stats() {
    let (app, _) = test_app().await;
    let (user_id, token) = register_and_login(&app, "jobs@example.com").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/jobs")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "company": "Acme",
                        "role": "Backend Engineer",
                        "status": "Interview",
                        "source": "LinkedIn",
                        "appliedDate": "2026-08-01"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Job application added successfully");
    assert_eq!(body["job"]["role"], "Backend Engineer");
    let job_id = body["job"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get_with_token(
            &format!("/api/jobs/user/{user_id}/status/Interview"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get_with_token(
            &format!("/api/jobs/user/{user_id}/status/Ghosted"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get_with_token(
            &format!("/api/jobs/user/{user_id}/stats"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["totalJobs"], 1);
    assert_eq!(body["interviewCount"], 1);
    assert_eq!(body["statusCounts"]["Applied"], 0);
    assert_eq!(body["sourceCounts"]["LinkedIn"], 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/jobs/{job_id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Job application deleted successfully");
}

#[tokio::test]
async fn test_grant_and_revoke_admin_role() {
    let (app, _) = test_app().await;
    let (user_id, user_token) = register_and_login(&app, "promote@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/admin/login",
            json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
        ))
        .await
        .unwrap();
    let admin_token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri(format!("/api/admin/users/{user_id}/make-admin"))
                .header(header::AUTHORIZATION, format!("Bearer {admin_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User granted admin privileges");
    assert_eq!(body["user"]["role"], "ADMIN");

    // The pre-promotion token still carries the USER role; the gate trusts
    // claims, not the current store state.
    let response = app
        .clone()
        .oneshot(get_with_token("/api/admin/users", &user_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A fresh login picks up the new role.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/users/login",
            json!({"email": "promote@example.com", "password": "Passw0rd"}),
        ))
        .await
        .unwrap();
    let fresh_token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(get_with_token("/api/admin/users", &fresh_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri(format!("/api/admin/users/{user_id}/revoke-admin"))
                .header(header::AUTHORIZATION, format!("Bearer {admin_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["role"], "USER");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let (app, state) = test_app().await;

    // Issued far enough in the past that its lifetime has elapsed.
    let issued_at = chrono::Utc::now().timestamp() - 7200;
    let token = state
        .codec
        .issue(1, "old@example.com", Role::User, issued_at);

    let response = app
        .oneshot(get_with_token("/api/users", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid or expired token");
}
