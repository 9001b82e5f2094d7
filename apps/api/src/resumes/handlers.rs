use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::sessions::Session;
use crate::errors::AppError;
use crate::models::resume::{ResumeRow, UpdateResume};
use crate::resumes::links;
use crate::resumes::store::{self, NewUpload};
use crate::state::AppState;

/// POST /api/v1/resumes
///
/// Multipart form: `file` (required), `name` (required display name),
/// `description` (optional).
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Json<ResumeRow>, AppError> {
    let mut name: Option<String> = None;
    let mut description: Option<String> = None;
    let mut file: Option<(String, String, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => {
                name = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("unreadable name field: {e}"))
                })?);
            }
            "description" => {
                description = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("unreadable description field: {e}"))
                })?);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("unreadable file field: {e}"))
                })?;
                file = Some((file_name, content_type, bytes));
            }
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::Validation("file part is required".to_string()))?;
    let name = name.ok_or_else(|| AppError::Validation("name part is required".to_string()))?;
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be blank".to_string()));
    }

    let row = store::upload_resume(
        &state.db,
        state.blob.as_ref(),
        &session,
        NewUpload {
            name,
            description,
            file_name,
            content_type,
            bytes,
        },
    )
    .await?;
    Ok(Json(row))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let rows = store::list_resumes(&state.db, &session).await?;
    Ok(Json(rows))
}

/// PATCH /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateResume>,
) -> Result<Json<ResumeRow>, AppError> {
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name must not be blank".to_string()));
        }
    }
    let row = store::update_resume(&state.db, &session, id, input).await?;
    Ok(Json(row))
}

/// POST /api/v1/resumes/:id/default
pub async fn handle_set_default_resume(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let row = store::set_default_resume(&state.db, &session, id).await?;
    Ok(Json(row))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store::delete_resume(&state.db, state.blob.as_ref(), &session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/applications/:id/resumes
pub async fn handle_list_attached(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let rows = links::list_attached(&state.db, &session, id).await?;
    Ok(Json(rows))
}

/// POST /api/v1/applications/:id/resumes/:resume_id
pub async fn handle_attach_resume(
    State(state): State<AppState>,
    session: Session,
    Path((id, resume_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    links::attach(&state.db, &session, id, resume_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/applications/:id/resumes/:resume_id
pub async fn handle_detach_resume(
    State(state): State<AppState>,
    session: Session,
    Path((id, resume_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    links::detach(&state.db, &session, id, resume_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
