//! Job application entity and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Lifecycle status of a job application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// All statuses, in lifecycle order. Used by the statistics aggregators so
    /// counts are reported even when zero.
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown application status: {0}")]
pub struct ParseStatusError(String);

impl std::str::FromStr for ApplicationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Applied" => Ok(ApplicationStatus::Applied),
            "Interview" => Ok(ApplicationStatus::Interview),
            "Offer" => Ok(ApplicationStatus::Offer),
            "Rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Stored job application record.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: i64,
    pub user_id: i64,
    pub company: String,
    pub title: String,
    pub status: ApplicationStatus,
    pub source: Option<String>,
    pub applied_date: NaiveDate,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for a job application.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[validate(length(min = 1, max = 100, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, max = 100, message = "Role is required"))]
    #[serde(alias = "role")]
    pub title: String,
    pub status: Option<ApplicationStatus>,
    pub source: Option<String>,
    pub applied_date: NaiveDate,
    pub deadline: Option<NaiveDate>,
}

/// Job application representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: i64,
    pub user_id: i64,
    pub company: String,
    #[serde(rename = "role")]
    pub title: String,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub applied_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Job> for JobResponse {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            user_id: job.user_id,
            company: job.company.clone(),
            title: job.title.clone(),
            status: job.status,
            source: job.source.clone(),
            applied_date: job.applied_date,
            deadline: job.deadline,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in ApplicationStatus::ALL {
            let parsed: ApplicationStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("applied".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_job_request_accepts_role_alias() {
        let req: JobRequest = serde_json::from_str(
            r#"{"company":"Acme","role":"Backend Engineer","appliedDate":"2025-08-01"}"#,
        )
        .unwrap();
        assert_eq!(req.title, "Backend Engineer");
        assert_eq!(req.status, None);
    }

    #[test]
    fn test_job_request_validation() {
        let req: JobRequest = serde_json::from_str(
            r#"{"company":"","title":"Engineer","appliedDate":"2025-08-01"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_job_response_serializes_title_as_role() {
        let job = Job {
            id: 7,
            user_id: 42,
            company: "Acme".to_string(),
            title: "Backend Engineer".to_string(),
            status: ApplicationStatus::Applied,
            source: Some("LinkedIn".to_string()),
            applied_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            deadline: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(JobResponse::from(&job)).unwrap();
        assert_eq!(json["role"], "Backend Engineer");
        assert_eq!(json["userId"], 42);
        assert_eq!(json["status"], "Applied");
    }
}
