//! API routes.

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::admin::{
    activate_user as admin_activate_user, deactivate_user as admin_deactivate_user,
    delete_user as admin_delete_user, get_user as admin_get_user, health as admin_health,
    list_admins, list_users as admin_list_users, login as admin_login, make_admin, revoke_admin,
    statistics,
};
use crate::handlers::jobs::{
    add_job, delete_job, get_dashboard_stats, get_job, get_stats, health as jobs_health,
    list_jobs, list_jobs_by_status, search_jobs, update_job,
};
use crate::handlers::users::{
    change_password, deactivate, delete_user, get_user, get_user_by_email, health as users_health,
    list_users, login, profile, register, update_user,
};
use crate::middleware::{auth_gate, cors_layer, request_logging};
use crate::state::AppState;

/// Create the API router.
///
/// Every route lives under `/api`, and the authentication gate is layered over
/// the whole namespace; which requests pass unauthenticated is decided by the
/// route classifier, not by where a route is mounted.
pub fn create_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users", get(list_users))
        .route("/users/profile", get(profile))
        .route("/users/health", get(users_health))
        .route("/users/email/:email", get(get_user_by_email))
        .route("/users/:id", get(get_user))
        .route("/users/:id", put(update_user))
        .route("/users/:id", delete(delete_user))
        .route("/users/:id/change-password", put(change_password))
        .route("/users/:id/deactivate", put(deactivate));

    let job_routes = Router::new()
        .route("/jobs", post(add_job))
        .route("/jobs/health", get(jobs_health))
        .route("/jobs/:id", get(get_job))
        .route("/jobs/:id", put(update_job))
        .route("/jobs/:id", delete(delete_job))
        .route("/jobs/user/:user_id", get(list_jobs))
        .route("/jobs/user/:user_id/status/:status", get(list_jobs_by_status))
        .route("/jobs/user/:user_id/search", get(search_jobs))
        .route("/jobs/user/:user_id/stats", get(get_stats))
        .route(
            "/jobs/user/:user_id/dashboard-stats",
            get(get_dashboard_stats),
        );

    let admin_routes = Router::new()
        .route("/admin/login", post(admin_login))
        .route("/admin/health", get(admin_health))
        .route("/admin/admins", get(list_admins))
        .route("/admin/users", get(admin_list_users))
        .route("/admin/users/:id", get(admin_get_user))
        .route("/admin/users/:id", delete(admin_delete_user))
        .route("/admin/users/:id/make-admin", put(make_admin))
        .route("/admin/users/:id/revoke-admin", put(revoke_admin))
        .route("/admin/users/:id/activate", put(admin_activate_user))
        .route("/admin/users/:id/deactivate", put(admin_deactivate_user))
        .route("/admin/statistics", get(statistics));

    let api_routes = Router::new()
        .merge(user_routes)
        .merge(job_routes)
        .merge(admin_routes);

    // The gate must see full `/api/...` paths, so it is layered outside the
    // nest; `Router::nest` strips the prefix before inner layers run.
    Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
