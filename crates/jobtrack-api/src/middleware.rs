//! API middleware: the authentication gate, CORS, and request logging.

use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::auth::{classify, Identity, RouteClass};
use crate::error::ErrorBody;
use crate::state::AppState;

/// Authentication gate.
///
/// Applied over the whole `/api` router; the only component that writes
/// terminal auth responses. Public routes (including all CORS pre-flights)
/// pass through without an identity; everything else must present a valid
/// `Bearer` token, and admin routes additionally require the ADMIN role.
/// Fail-closed: a request whose identity cannot be positively established is
/// never forwarded.
pub async fn auth_gate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response<Body> {
    let class = classify(req.method(), req.uri().path());
    if class == RouteClass::Public {
        return next.run(req).await;
    }

    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let token = match bearer {
        Some(token) => token,
        None => {
            return reject(
                StatusCode::UNAUTHORIZED,
                "Missing or invalid authorization header",
            );
        }
    };

    let claims = match state.codec.validate(token, Utc::now().timestamp()) {
        Ok(claims) => claims,
        Err(err) => {
            // The error kind stays in the logs; the response is uniform so it
            // cannot be used as a validation oracle.
            warn!(path = %req.uri().path(), error = %err, "token validation failed");
            return reject(StatusCode::UNAUTHORIZED, "Invalid or expired token");
        }
    };

    let identity = Identity::from(claims);
    if class == RouteClass::RequiresAdmin && !identity.role.is_admin() {
        warn!(
            path = %req.uri().path(),
            user_id = identity.user_id,
            "non-admin rejected on admin route"
        );
        return reject(StatusCode::FORBIDDEN, "Admin access required");
    }

    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// Terminal rejection response written by the gate.
fn reject(status: StatusCode, message: &str) -> Response<Body> {
    (status, Json(ErrorBody::new(message, status))).into_response()
}

/// Create CORS layer.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if origins.iter().any(|o| o == "*") {
        // Wildcard origin: credentials are not allowed, so Any is usable.
        CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(Any)
            .max_age(std::time::Duration::from_secs(3600))
    } else {
        // Explicit origins with credentials; tower-http panics if credentials
        // are combined with wildcard headers.
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_methods(allowed_methods)
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers([header::AUTHORIZATION])
            .allow_credentials(true)
            .allow_origin(origins)
            .max_age(std::time::Duration::from_secs(3600))
    }
}

/// Request logging middleware.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let duration = start.elapsed();

    // Skip health check logging
    if !uri.path().contains("/health") {
        info!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}
