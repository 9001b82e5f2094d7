use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::sessions::Session;
use crate::errors::AppError;
use crate::models::notification::{
    CreateFollowUpReminder, CreateInterviewSchedule, CreateNotification, FollowUpReminderRow,
    InterviewScheduleRow, NotificationRow, UpdateInterviewSchedule,
};
use crate::reminders::store;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NotificationQuery {
    pub unread: Option<bool>,
}

#[derive(Deserialize)]
pub struct InterviewQuery {
    pub upcoming: Option<bool>,
}

#[derive(Deserialize)]
pub struct ReminderQuery {
    pub pending: Option<bool>,
}

/// GET /api/v1/notifications?unread=true
pub async fn handle_list_notifications(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<NotificationQuery>,
) -> Result<Json<Vec<NotificationRow>>, AppError> {
    let rows = if params.unread.unwrap_or(false) {
        store::list_unread_notifications(&state.db, &session).await?
    } else {
        store::list_notifications(&state.db, &session).await?
    };
    Ok(Json(rows))
}

/// POST /api/v1/notifications
pub async fn handle_create_notification(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<CreateNotification>,
) -> Result<Json<NotificationRow>, AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be blank".to_string()));
    }
    let row = store::create_notification(&state.db, &session, &input).await?;
    Ok(Json(row))
}

/// POST /api/v1/notifications/:id/read
pub async fn handle_mark_notification_read(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store::mark_notification_read(&state.db, &session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
pub async fn handle_mark_all_notifications_read(
    State(state): State<AppState>,
    session: Session,
) -> Result<StatusCode, AppError> {
    store::mark_all_notifications_read(&state.db, &session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/notifications/:id
pub async fn handle_delete_notification(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store::delete_notification(&state.db, &session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/interviews?upcoming=true
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<InterviewQuery>,
) -> Result<Json<Vec<InterviewScheduleRow>>, AppError> {
    let rows = if params.upcoming.unwrap_or(false) {
        store::list_upcoming_interviews(&state.db, &session).await?
    } else {
        store::list_interviews(&state.db, &session).await?
    };
    Ok(Json(rows))
}

/// POST /api/v1/interviews
pub async fn handle_create_interview(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<CreateInterviewSchedule>,
) -> Result<Json<InterviewScheduleRow>, AppError> {
    let row = store::create_interview(&state.db, &session, &input).await?;
    Ok(Json(row))
}

/// PATCH /api/v1/interviews/:id
pub async fn handle_update_interview(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateInterviewSchedule>,
) -> Result<Json<InterviewScheduleRow>, AppError> {
    let row = store::update_interview(&state.db, &session, id, input).await?;
    Ok(Json(row))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store::delete_interview(&state.db, &session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/reminders?pending=true
pub async fn handle_list_reminders(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ReminderQuery>,
) -> Result<Json<Vec<FollowUpReminderRow>>, AppError> {
    let rows = if params.pending.unwrap_or(false) {
        store::list_pending_reminders(&state.db, &session).await?
    } else {
        store::list_reminders(&state.db, &session).await?
    };
    Ok(Json(rows))
}

/// POST /api/v1/reminders
pub async fn handle_create_reminder(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<CreateFollowUpReminder>,
) -> Result<Json<FollowUpReminderRow>, AppError> {
    let row = store::create_reminder(&state.db, &session, &input).await?;
    Ok(Json(row))
}

/// POST /api/v1/reminders/:id/complete
pub async fn handle_complete_reminder(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store::complete_reminder(&state.db, &session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/reminders/:id
pub async fn handle_delete_reminder(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store::delete_reminder(&state.db, &session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
