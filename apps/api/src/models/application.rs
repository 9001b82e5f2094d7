use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pipeline stage of an application. Transitions are unrestricted: any stage
/// may move to any other via an explicit edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Assessment,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    /// Fixed display order used by the analytics status distribution.
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Assessment,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Assessment => "assessment",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Lenient parse for stored values. Rows predating the typed boundary may
    /// carry arbitrary strings; those yield `None` and are kept out of the
    /// status buckets without failing the caller.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "applied" => Some(ApplicationStatus::Applied),
            "assessment" => Some(ApplicationStatus::Assessment),
            "interview" => Some(ApplicationStatus::Interview),
            "offer" => Some(ApplicationStatus::Offer),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl JobType {
    pub fn as_str(self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Freelance => "freelance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// A job application as stored. Enumerated columns stay `String` here so
/// reads remain total over legacy rows; writes go through the typed inputs
/// below.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub role: String,
    pub portal_url: Option<String>,
    pub status: String,
    pub deadline: Option<NaiveDate>,
    pub notes: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub application_date: Option<NaiveDate>,
    pub job_type: String,
    pub source: Option<String>,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating an application. Unknown status/job-type/
/// priority strings are rejected at deserialization, before any store call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApplication {
    pub company: String,
    pub role: String,
    pub portal_url: Option<String>,
    pub status: ApplicationStatus,
    pub deadline: Option<NaiveDate>,
    pub notes: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub application_date: Option<NaiveDate>,
    pub job_type: JobType,
    pub source: Option<String>,
    pub priority: Priority,
}

/// Partial update; `None` leaves the column untouched. `updated_at` is
/// refreshed on every update regardless of which fields changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApplication {
    pub company: Option<String>,
    pub role: Option<String>,
    pub portal_url: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub deadline: Option<NaiveDate>,
    pub notes: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub application_date: Option<NaiveDate>,
    pub job_type: Option<JobType>,
    pub source: Option<String>,
    pub priority: Option<Priority>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_parse() {
        for status in ApplicationStatus::ALL {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_unknown_status_parses_to_none() {
        assert_eq!(ApplicationStatus::parse("ghosted"), None);
        assert_eq!(ApplicationStatus::parse(""), None);
        assert_eq!(ApplicationStatus::parse("Applied"), None); // case-sensitive
    }

    #[test]
    fn test_job_type_uses_hyphenated_labels() {
        assert_eq!(JobType::FullTime.as_str(), "full-time");
        let parsed: JobType = serde_json::from_str("\"part-time\"").unwrap();
        assert_eq!(parsed, JobType::PartTime);
    }

    #[test]
    fn test_create_rejects_unknown_status() {
        let payload = serde_json::json!({
            "company": "Acme",
            "role": "Engineer",
            "status": "daydreaming",
            "job_type": "full-time",
            "priority": "high"
        });
        assert!(serde_json::from_value::<CreateApplication>(payload).is_err());
    }

    #[test]
    fn test_update_defaults_to_no_changes() {
        let update: UpdateApplication = serde_json::from_str("{}").unwrap();
        assert!(update.company.is_none());
        assert!(update.status.is_none());
    }
}
