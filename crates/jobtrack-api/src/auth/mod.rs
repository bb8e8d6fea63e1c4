//! Authentication: token codec, route policy, per-request identity.

pub mod password;
pub mod policy;
pub mod token;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use jobtrack_models::Role;

use crate::error::ApiError;

pub use policy::{classify, RouteClass, ADMIN_NAMESPACE};
pub use token::{Claims, TokenCodec, TokenError};

/// Validated caller identity for one request.
///
/// Built exactly once by the authentication gate from validated claims and
/// handed to handlers through request extensions. Requests on public routes
/// carry no identity, so handlers on those routes must not extract one.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    pub authenticated: bool,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            authenticated: true,
        }
    }
}

/// Axum extractor: pulls the identity the gate stored on the request.
#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Unauthorized - Token required"))
    }
}
