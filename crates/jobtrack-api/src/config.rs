//! API configuration.

use std::time::Duration;

use anyhow::Context;

/// Default bearer token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// API server configuration.
///
/// Loaded once at startup; the signing secret and token TTL are immutable for
/// the process lifetime (no hot-reload).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Secret key for HMAC token signing
    pub jwt_secret: String,
    /// Bearer token lifetime
    pub token_ttl: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Bootstrap administrator credentials, seeded at startup
    pub admin_email: String,
    pub admin_password: String,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
            jwt_secret: String::new(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            max_body_size: 1024 * 1024, // 1MB
            admin_email: "admin@jobtrack.local".to_string(),
            admin_password: String::new(),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    ///
    /// Fails when `JWT_SECRET` or `ADMIN_PASSWORD` is missing; everything
    /// else has a development default.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let admin_password =
            std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;

        Ok(Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            jwt_secret,
            token_ttl: Duration::from_secs(
                std::env::var("TOKEN_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            ),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@jobtrack.local".to_string()),
            admin_password,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
