use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::application::JobApplicationRow;

/// Stored resume metadata. The file bytes live in blob storage under
/// `file_path` (the object key); only this row is relational.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub version: String,
    pub is_default: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join row linking an application to a resume. The pair is unique, so a
/// repeated attach is a no-op rather than a second link.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationResumeRow {
    pub application_id: Uuid,
    pub resume_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One row of the applications-to-resumes LEFT JOIN. Resume columns are all
/// optional: a dangling link yields `None`s and is dropped during flattening.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeLinkRow {
    pub application_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub version: Option<String>,
    pub is_default: Option<bool>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ResumeLinkRow {
    /// Rebuilds the joined resume, or `None` when the link points nowhere.
    pub fn into_resume(self) -> Option<ResumeRow> {
        Some(ResumeRow {
            id: self.resume_id?,
            user_id: self.user_id?,
            name: self.name?,
            file_name: self.file_name?,
            file_path: self.file_path?,
            file_size: self.file_size?,
            file_type: self.file_type?,
            version: self.version?,
            is_default: self.is_default?,
            description: self.description,
            created_at: self.created_at?,
            updated_at: self.updated_at?,
        })
    }
}

/// An application denormalized with its attached resumes, the shape the
/// list-with-resumes endpoint returns.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithResumes {
    #[serde(flatten)]
    pub application: JobApplicationRow,
    pub attached_resumes: Vec<ResumeRow>,
}

/// Metadata-only update. The default flag has its own endpoint so the
/// one-default-per-user invariant cannot be bypassed here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateResume {
    pub name: Option<String>,
    pub description: Option<String>,
}
