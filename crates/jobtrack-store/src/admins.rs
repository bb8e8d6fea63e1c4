//! Administrator store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use jobtrack_models::{Admin, Role};

/// In-memory administrator collection, separate from regular users.
#[derive(Clone, Default)]
pub struct AdminStore {
    admins: Arc<RwLock<HashMap<i64, Admin>>>,
    next_id: Arc<AtomicI64>,
}

impl AdminStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an administrator. Used at startup to seed the bootstrap admin.
    pub async fn insert(&self, name: String, email: String, password_hash: String) -> Admin {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let now = Utc::now();
        let admin = Admin {
            id,
            name,
            email,
            password_hash,
            role: Role::Admin,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
        };
        self.admins.write().await.insert(id, admin.clone());
        admin
    }

    pub async fn get_by_email(&self, email: &str) -> Option<Admin> {
        self.admins
            .read()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned()
    }

    /// All administrators, ordered by id.
    pub async fn list(&self) -> Vec<Admin> {
        let mut admins: Vec<Admin> = self.admins.read().await.values().cloned().collect();
        admins.sort_by_key(|a| a.id);
        admins
    }

    /// Write back a modified admin, bumping `updated_at`.
    pub async fn save(&self, mut admin: Admin) -> Option<Admin> {
        let mut admins = self.admins.write().await;
        if !admins.contains_key(&admin.id) {
            return None;
        }
        admin.updated_at = Utc::now();
        admins.insert(admin.id, admin.clone());
        Some(admin)
    }
}
