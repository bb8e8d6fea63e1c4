//! Job application store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use jobtrack_models::{ApplicationStatus, Job, JobRequest};

/// In-memory job application collection.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<i64, Job>>>,
    next_id: Arc<AtomicI64>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new job application owned by `user_id`.
    pub async fn insert(&self, user_id: i64, req: JobRequest) -> Job {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let now = Utc::now();
        let job = Job {
            id,
            user_id,
            company: req.company,
            title: req.title,
            status: req.status.unwrap_or_default(),
            source: req.source,
            applied_date: req.applied_date,
            deadline: req.deadline,
            created_at: now,
            updated_at: now,
        };
        self.jobs.write().await.insert(id, job.clone());
        job
    }

    pub async fn get(&self, id: i64) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// All applications owned by `user_id`, ordered by id.
    pub async fn list_by_user(&self, user_id: i64) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .read()
            .await
            .values()
            .filter(|j| j.user_id == user_id)
            .cloned()
            .collect();
        jobs.sort_by_key(|j| j.id);
        jobs
    }

    pub async fn list_by_user_and_status(
        &self,
        user_id: i64,
        status: ApplicationStatus,
    ) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .read()
            .await
            .values()
            .filter(|j| j.user_id == user_id && j.status == status)
            .cloned()
            .collect();
        jobs.sort_by_key(|j| j.id);
        jobs
    }

    /// Case-insensitive substring search over company and title.
    pub async fn search(&self, user_id: i64, keyword: &str) -> Vec<Job> {
        let needle = keyword.to_lowercase();
        let mut jobs: Vec<Job> = self
            .jobs
            .read()
            .await
            .values()
            .filter(|j| {
                j.user_id == user_id
                    && (j.company.to_lowercase().contains(&needle)
                        || j.title.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        jobs.sort_by_key(|j| j.id);
        jobs
    }

    /// Write back a modified job, bumping `updated_at`.
    pub async fn save(&self, mut job: Job) -> Option<Job> {
        let mut jobs = self.jobs.write().await;
        if !jobs.contains_key(&job.id) {
            return None;
        }
        job.updated_at = Utc::now();
        jobs.insert(job.id, job.clone());
        Some(job)
    }

    pub async fn delete(&self, id: i64) -> bool {
        self.jobs.write().await.remove(&id).is_some()
    }

    /// Delete all applications owned by `user_id`; returns how many were
    /// removed. Called when a user account is deleted.
    pub async fn delete_by_user(&self, user_id: i64) -> usize {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, j| j.user_id != user_id);
        before - jobs.len()
    }

    pub async fn count(&self) -> u64 {
        self.jobs.read().await.len() as u64
    }
}
