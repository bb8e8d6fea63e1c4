//! Bearer token issuance and validation.
//!
//! Tokens are three URL-safe base64 segments, `header.claims.signature`, with
//! the signature an HMAC-SHA256 over the first two segments. Pure computation
//! only: the codec does no I/O and holds no mutable state, so a single
//! instance is shared read-only across all requests. The current time is
//! always supplied by the caller.

use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use jobtrack_models::Role;

type HmacSha256 = Hmac<Sha256>;

/// Token header segment. Fixed for every issued token; covered by the
/// signature but otherwise not interpreted during validation.
#[derive(Debug, Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: Header = Header {
    alg: "HS256",
    typ: "JWT",
};

/// Identity facts embedded in a token. Immutable once issued: a changed claim
/// means issuing a new token at the next login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal id
    pub sub: i64,
    pub email: String,
    pub role: Role,
    /// Issued-at (epoch seconds)
    pub iat: i64,
    /// Expiry (epoch seconds)
    pub exp: i64,
}

/// Validation failure kinds. Internal distinction only: the gate collapses
/// all of these into the same generic 401 so callers cannot use the codec as
/// a validation oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token is expired")]
    Expired,
}

/// Issues and validates signed bearer tokens.
pub struct TokenCodec {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length.
        HmacSha256::new_from_slice(&self.secret).expect("HMAC key")
    }

    /// Issue a token for the given principal at time `now` (epoch seconds).
    pub fn issue(&self, sub: i64, email: &str, role: Role, now: i64) -> String {
        let claims = Claims {
            sub,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&HEADER).expect("header json"));
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).expect("claims json"));

        let mut mac = self.mac();
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{header}.{payload}.{signature}")
    }

    /// Validate `token` at time `now` (epoch seconds).
    ///
    /// The signature is checked before the claims segment is decoded, with a
    /// constant-time comparison; expiry is a strict `now > exp` with no
    /// leeway.
    pub fn validate(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut segments = token.split('.');
        let (header, payload, signature) =
            match (segments.next(), segments.next(), segments.next(), segments.next()) {
                (Some(h), Some(p), Some(s), None) => (h, p, s),
                _ => return Err(TokenError::Malformed),
            };
        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(TokenError::Malformed);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac();
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::SignatureInvalid)?;

        let claims_bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&claims_bytes).map_err(|_| TokenError::Malformed)?;

        if now > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
