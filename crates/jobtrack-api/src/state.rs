//! Application state.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use jobtrack_store::{AdminStore, JobStore, UserStore};

use crate::auth::{password, TokenCodec};
use crate::config::ApiConfig;

/// Shared application state.
///
/// Everything here is either immutable configuration (codec, config) or an
/// internally synchronized store handle; cloning is cheap and the gate itself
/// holds no mutable per-request state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub codec: Arc<TokenCodec>,
    pub users: UserStore,
    pub admins: AdminStore,
    pub jobs: JobStore,
}

impl AppState {
    /// Create new application state and seed the bootstrap administrator.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let codec = Arc::new(TokenCodec::new(
            config.jwt_secret.as_bytes().to_vec(),
            config.token_ttl,
        ));

        let admins = AdminStore::new();
        let admin_hash = password::hash(&config.admin_password)
            .context("Failed to hash bootstrap admin password")?;
        let admin = admins
            .insert(
                "Administrator".to_string(),
                config.admin_email.clone(),
                admin_hash,
            )
            .await;
        info!(email = %admin.email, "Seeded bootstrap administrator");

        Ok(Self {
            config,
            codec,
            users: UserStore::new(),
            admins,
            jobs: JobStore::new(),
        })
    }
}
