//! User store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use jobtrack_models::{Role, User};

/// New-user payload; id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// In-memory user collection.
#[derive(Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<i64, User>>>,
    next_id: Arc<AtomicI64>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new user, assigning the next id.
    pub async fn insert(&self, new: NewUser) -> User {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let now = Utc::now();
        let user = User {
            id,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
        };
        self.users.write().await.insert(id, user.clone());
        user
    }

    pub async fn get(&self, id: i64) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn get_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    pub async fn exists_by_email(&self, email: &str) -> bool {
        self.users.read().await.values().any(|u| u.email == email)
    }

    /// All users, ordered by id.
    pub async fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        users
    }

    /// Write back a modified user, bumping `updated_at`. Returns the stored
    /// record, or `None` if the user no longer exists.
    pub async fn save(&self, mut user: User) -> Option<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return None;
        }
        user.updated_at = Utc::now();
        users.insert(user.id, user.clone());
        Some(user)
    }

    pub async fn delete(&self, id: i64) -> bool {
        self.users.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> u64 {
        self.users.read().await.len() as u64
    }
}
