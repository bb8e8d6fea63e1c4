//! Route access policy.
//!
//! Pure classification of (method, path) into an access level. The allowlist
//! is fixed configuration; nothing here looks at the request body or any
//! identity.

use std::collections::HashSet;
use std::sync::LazyLock;

use axum::http::Method;

/// Namespace whose routes require the ADMIN role (its own login and health
/// endpoints excepted).
pub const ADMIN_NAMESPACE: &str = "/api/admin";

/// Exact-match public paths: login and registration endpoints.
static PUBLIC_PATHS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "/api/users/login",
        "/api/users/register",
        "/api/admin/login",
    ])
});

/// Health-check endpoints, matched by prefix.
const HEALTH_PREFIXES: [&str; 3] = [
    "/api/users/health",
    "/api/jobs/health",
    "/api/admin/health",
];

/// Access level required for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// No token required; no identity is populated.
    Public,
    /// Any authenticated identity.
    RequiresAuth,
    /// Authenticated identity with the ADMIN role.
    RequiresAdmin,
}

/// Classify a request path.
pub fn classify(method: &Method, path: &str) -> RouteClass {
    // CORS pre-flight is never gated.
    if method == Method::OPTIONS {
        return RouteClass::Public;
    }

    if PUBLIC_PATHS.contains(path) || HEALTH_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return RouteClass::Public;
    }

    if path.starts_with(ADMIN_NAMESPACE) {
        return RouteClass::RequiresAdmin;
    }

    RouteClass::RequiresAuth
}
