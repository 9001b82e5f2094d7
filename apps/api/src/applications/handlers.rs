use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::applications::store;
use crate::auth::sessions::Session;
use crate::errors::AppError;
use crate::models::application::{CreateApplication, JobApplicationRow, UpdateApplication};
use crate::models::resume::ApplicationWithResumes;
use crate::reminders::auto::create_auto_reminders;
use crate::resumes::links;
use crate::state::AppState;

fn require_nonblank(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<JobApplicationRow>>, AppError> {
    let rows = store::list_applications(&state.db, &session).await?;
    Ok(Json(rows))
}

/// GET /api/v1/applications/with-resumes
pub async fn handle_list_with_resumes(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<ApplicationWithResumes>>, AppError> {
    let rows = links::list_with_attached(&state.db, &session).await?;
    Ok(Json(rows))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<JobApplicationRow>, AppError> {
    let row = store::get_application(&state.db, &session, id).await?;
    Ok(Json(row))
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<CreateApplication>,
) -> Result<Json<JobApplicationRow>, AppError> {
    require_nonblank(&input.company, "company")?;
    require_nonblank(&input.role, "role")?;

    let row = store::create_application(&state.db, &session, &input).await?;

    // Reminders and the follow-up notification key off the application date;
    // without one there is nothing to schedule.
    if row.application_date.is_some() {
        create_auto_reminders(&state.db, &session, &row).await?;
    }

    Ok(Json(row))
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateApplication>,
) -> Result<Json<JobApplicationRow>, AppError> {
    if let Some(company) = &input.company {
        require_nonblank(company, "company")?;
    }
    if let Some(role) = &input.role {
        require_nonblank(role, "role")?;
    }

    let row = store::update_application(&state.db, &session, id, input).await?;
    Ok(Json(row))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store::delete_application(&state.db, &session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_nonblank_rejects_whitespace_only() {
        assert!(require_nonblank("Acme", "company").is_ok());
        assert!(require_nonblank("   ", "company").is_err());
        assert!(require_nonblank("", "role").is_err());
    }
}
