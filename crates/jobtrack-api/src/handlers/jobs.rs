//! Job application handlers.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, Months, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use jobtrack_models::{ApplicationStatus, Job, JobRequest, JobResponse};

use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::handlers::{HealthResponse, JobEnvelope, MessageResponse};
use crate::state::AppState;

/// Create a job application owned by the calling user.
pub async fn add_job(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<JobRequest>,
) -> ApiResult<(StatusCode, Json<JobEnvelope>)> {
    request.validate()?;

    let job = state.jobs.insert(identity.user_id, request).await;
    info!(job_id = job.id, user_id = identity.user_id, "job application added");

    Ok((
        StatusCode::CREATED,
        Json(JobEnvelope::ok(
            "Job application added successfully",
            JobResponse::from(&job),
        )),
    ))
}

/// Get a job application by id.
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<JobResponse>> {
    let job = state
        .jobs
        .get(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Job not found with id: {id}")))?;
    Ok(Json(JobResponse::from(&job)))
}

/// Update a job application.
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<JobRequest>,
) -> ApiResult<Json<JobEnvelope>> {
    request.validate()?;

    let mut job = state
        .jobs
        .get(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Job not found with id: {id}")))?;

    job.company = request.company;
    job.title = request.title;
    job.status = request.status.unwrap_or(job.status);
    job.source = request.source;
    job.applied_date = request.applied_date;
    job.deadline = request.deadline;

    let job = state
        .jobs
        .save(job)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Job not found with id: {id}")))?;

    Ok(Json(JobEnvelope::ok(
        "Job application updated successfully",
        JobResponse::from(&job),
    )))
}

/// Delete a job application.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.jobs.delete(id).await {
        return Err(ApiError::not_found(format!("Job not found with id: {id}")));
    }
    Ok(Json(MessageResponse::ok(
        "Job application deleted successfully",
    )))
}

/// List all job applications for a user.
pub async fn list_jobs(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Json<Vec<JobResponse>> {
    let jobs = state.jobs.list_by_user(user_id).await;
    Json(jobs.iter().map(JobResponse::from).collect())
}

/// List a user's job applications filtered by status.
pub async fn list_jobs_by_status(
    State(state): State<AppState>,
    Path((user_id, status)): Path<(i64, String)>,
) -> ApiResult<Json<Vec<JobResponse>>> {
    let status: ApplicationStatus = status
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Unknown application status: {status}")))?;

    let jobs = state.jobs.list_by_user_and_status(user_id, status).await;
    Ok(Json(jobs.iter().map(JobResponse::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: String,
}

/// Keyword search over a user's applications (company and role).
pub async fn search_jobs(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<JobResponse>> {
    let jobs = state.jobs.search(user_id, &params.keyword).await;
    Json(jobs.iter().map(JobResponse::from).collect())
}

/// Per-user application statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatistics {
    pub status_counts: HashMap<String, u64>,
    pub source_counts: HashMap<String, u64>,
    pub total_jobs: u64,
    pub applied_count: u64,
    pub interview_count: u64,
    pub offer_count: u64,
    pub rejected_count: u64,
}

/// Status and source breakdown for a user's applications.
pub async fn get_stats(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Json<JobStatistics> {
    let jobs = state.jobs.list_by_user(user_id).await;
    let status_counts = count_statuses(&jobs);
    let source_counts = count_sources(&jobs);

    let count = |status: ApplicationStatus| {
        status_counts.get(status.as_str()).copied().unwrap_or(0)
    };

    Json(JobStatistics {
        total_jobs: jobs.len() as u64,
        applied_count: count(ApplicationStatus::Applied),
        interview_count: count(ApplicationStatus::Interview),
        offer_count: count(ApplicationStatus::Offer),
        rejected_count: count(ApplicationStatus::Rejected),
        status_counts,
        source_counts,
    })
}

/// Per-user dashboard statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_jobs: u64,
    pub status_counts: HashMap<String, u64>,
    pub source_counts: HashMap<String, u64>,
    /// Applications per month over the last six months, keyed "Mar 2025".
    pub monthly_applications: HashMap<String, u64>,
    pub success_rate: f64,
}

/// Dashboard rollup: monthly application volume and success rate.
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Json<DashboardStats> {
    let jobs = state.jobs.list_by_user(user_id).await;
    let status_counts = count_statuses(&jobs);

    let today = Utc::now().date_naive();
    let mut monthly_applications = HashMap::new();
    for months_back in 0..6u32 {
        let Some(month) = today.checked_sub_months(Months::new(months_back)) else {
            continue;
        };
        let count = jobs
            .iter()
            .filter(|j| {
                j.applied_date.year() == month.year() && j.applied_date.month() == month.month()
            })
            .count() as u64;
        monthly_applications.insert(month.format("%b %Y").to_string(), count);
    }

    Json(DashboardStats {
        total_jobs: jobs.len() as u64,
        success_rate: success_rate(&status_counts),
        status_counts,
        source_counts: count_sources(&jobs),
        monthly_applications,
    })
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::up("Job Tracker API is running"))
}

fn count_statuses(jobs: &[Job]) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = ApplicationStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    for job in jobs {
        *counts.entry(job.status.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

fn count_sources(jobs: &[Job]) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for source in jobs.iter().filter_map(|j| j.source.as_deref()) {
        *counts.entry(source.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Offers and interviews as a share of all applications, in percent.
fn success_rate(status_counts: &HashMap<String, u64>) -> f64 {
    let total: u64 = status_counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    let successful = status_counts
        .get(ApplicationStatus::Offer.as_str())
        .copied()
        .unwrap_or(0)
        + status_counts
            .get(ApplicationStatus::Interview.as_str())
            .copied()
            .unwrap_or(0);
    (successful as f64 * 100.0) / total as f64
}
