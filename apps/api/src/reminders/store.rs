//! Notifications, interview schedules, and follow-up reminders. List and
//! fetch queries LEFT JOIN the owning application so each row carries
//! `application_company`/`application_role`; rows without an application
//! keep those as NULL.
//!
//! `INSERT/UPDATE ... RETURNING` cannot produce the joined columns, so
//! writes re-fetch through the joined select.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::sessions::Session;
use crate::errors::AppError;
use crate::models::notification::{
    CreateFollowUpReminder, CreateInterviewSchedule, CreateNotification, FollowUpReminderRow,
    InterviewScheduleRow, NotificationRow, UpdateInterviewSchedule,
};

// ── Notifications ───────────────────────────────────────────────────────────

const NOTIFICATION_SELECT: &str = r#"
    SELECT n.id, n.user_id, n.application_id, n.type AS notification_type,
           n.title, n.message, n.scheduled_for, n.is_read, n.is_sent,
           n.created_at, n.updated_at,
           a.company AS application_company, a.role AS application_role
    FROM notifications n
    LEFT JOIN job_applications a ON a.id = n.application_id
"#;

pub async fn list_notifications(
    pool: &PgPool,
    session: &Session,
) -> Result<Vec<NotificationRow>, AppError> {
    let query = format!("{NOTIFICATION_SELECT} WHERE n.user_id = $1 ORDER BY n.scheduled_for");
    let rows = sqlx::query_as::<_, NotificationRow>(&query)
        .bind(session.user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn list_unread_notifications(
    pool: &PgPool,
    session: &Session,
) -> Result<Vec<NotificationRow>, AppError> {
    let query = format!(
        "{NOTIFICATION_SELECT} WHERE n.user_id = $1 AND NOT n.is_read ORDER BY n.scheduled_for"
    );
    let rows = sqlx::query_as::<_, NotificationRow>(&query)
        .bind(session.user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create_notification(
    pool: &PgPool,
    session: &Session,
    input: &CreateNotification,
) -> Result<NotificationRow, AppError> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO notifications (user_id, application_id, type, title, message, scheduled_for)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(session.user_id)
    .bind(input.application_id)
    .bind(input.notification_type.as_str())
    .bind(&input.title)
    .bind(&input.message)
    .bind(input.scheduled_for)
    .fetch_one(pool)
    .await?;

    get_notification(pool, session, id).await
}

pub async fn mark_notification_read(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = true, updated_at = now() WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(session.user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Notification {id} not found")));
    }
    Ok(())
}

/// Marks every unread notification read. Already-read rows keep their
/// `updated_at`; marking with nothing unread is a no-op success.
pub async fn mark_all_notifications_read(
    pool: &PgPool,
    session: &Session,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE notifications SET is_read = true, updated_at = now() WHERE user_id = $1 AND NOT is_read",
    )
    .bind(session.user_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_notification(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(session.user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Notification {id} not found")));
    }
    Ok(())
}

async fn get_notification(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
) -> Result<NotificationRow, AppError> {
    let query = format!("{NOTIFICATION_SELECT} WHERE n.id = $1 AND n.user_id = $2");
    let row = sqlx::query_as::<_, NotificationRow>(&query)
        .bind(id)
        .bind(session.user_id)
        .fetch_optional(pool)
        .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Notification {id} not found")))
}

// ── Interview schedules ─────────────────────────────────────────────────────

const INTERVIEW_SELECT: &str = r#"
    SELECT i.id, i.user_id, i.application_id, i.interview_type, i.scheduled_date,
           i.duration_minutes, i.location, i.meeting_link, i.interviewer_name,
           i.interviewer_email, i.notes, i.status, i.created_at, i.updated_at,
           a.company AS application_company, a.role AS application_role
    FROM interview_schedules i
    LEFT JOIN job_applications a ON a.id = i.application_id
"#;

pub async fn list_interviews(
    pool: &PgPool,
    session: &Session,
) -> Result<Vec<InterviewScheduleRow>, AppError> {
    let query = format!("{INTERVIEW_SELECT} WHERE i.user_id = $1 ORDER BY i.scheduled_date");
    let rows = sqlx::query_as::<_, InterviewScheduleRow>(&query)
        .bind(session.user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Interviews still in the future and still in `scheduled` status.
pub async fn list_upcoming_interviews(
    pool: &PgPool,
    session: &Session,
) -> Result<Vec<InterviewScheduleRow>, AppError> {
    let query = format!(
        "{INTERVIEW_SELECT} WHERE i.user_id = $1 AND i.status = 'scheduled' \
         AND i.scheduled_date >= now() ORDER BY i.scheduled_date"
    );
    let rows = sqlx::query_as::<_, InterviewScheduleRow>(&query)
        .bind(session.user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create_interview(
    pool: &PgPool,
    session: &Session,
    input: &CreateInterviewSchedule,
) -> Result<InterviewScheduleRow, AppError> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO interview_schedules
            (user_id, application_id, interview_type, scheduled_date, duration_minutes,
             location, meeting_link, interviewer_name, interviewer_email, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id
        "#,
    )
    .bind(session.user_id)
    .bind(input.application_id)
    .bind(input.interview_type.as_str())
    .bind(input.scheduled_date)
    .bind(input.duration_minutes.unwrap_or(60))
    .bind(&input.location)
    .bind(&input.meeting_link)
    .bind(&input.interviewer_name)
    .bind(&input.interviewer_email)
    .bind(&input.notes)
    .fetch_one(pool)
    .await?;

    get_interview(pool, session, id).await
}

pub async fn update_interview(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
    input: UpdateInterviewSchedule,
) -> Result<InterviewScheduleRow, AppError> {
    let query = interview_update_query(&input);

    let mut q = sqlx::query(&query).bind(id).bind(session.user_id);
    if let Some(interview_type) = input.interview_type {
        q = q.bind(interview_type.as_str());
    }
    if let Some(scheduled_date) = input.scheduled_date {
        q = q.bind(scheduled_date);
    }
    if let Some(duration_minutes) = input.duration_minutes {
        q = q.bind(duration_minutes);
    }
    if let Some(location) = input.location {
        q = q.bind(location);
    }
    if let Some(meeting_link) = input.meeting_link {
        q = q.bind(meeting_link);
    }
    if let Some(interviewer_name) = input.interviewer_name {
        q = q.bind(interviewer_name);
    }
    if let Some(interviewer_email) = input.interviewer_email {
        q = q.bind(interviewer_email);
    }
    if let Some(notes) = input.notes {
        q = q.bind(notes);
    }
    if let Some(status) = input.status {
        q = q.bind(status.as_str());
    }

    let result = q.execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Interview {id} not found")));
    }

    get_interview(pool, session, id).await
}

pub async fn delete_interview(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM interview_schedules WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(session.user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Interview {id} not found")));
    }
    Ok(())
}

async fn get_interview(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
) -> Result<InterviewScheduleRow, AppError> {
    let query = format!("{INTERVIEW_SELECT} WHERE i.id = $1 AND i.user_id = $2");
    let row = sqlx::query_as::<_, InterviewScheduleRow>(&query)
        .bind(id)
        .bind(session.user_id)
        .fetch_optional(pool)
        .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))
}

fn interview_update_query(input: &UpdateInterviewSchedule) -> String {
    let mut query = String::from("UPDATE interview_schedules SET updated_at = now()");
    let mut param_count = 2;

    if input.interview_type.is_some() {
        param_count += 1;
        query.push_str(&format!(", interview_type = ${param_count}"));
    }
    if input.scheduled_date.is_some() {
        param_count += 1;
        query.push_str(&format!(", scheduled_date = ${param_count}"));
    }
    if input.duration_minutes.is_some() {
        param_count += 1;
        query.push_str(&format!(", duration_minutes = ${param_count}"));
    }
    if input.location.is_some() {
        param_count += 1;
        query.push_str(&format!(", location = ${param_count}"));
    }
    if input.meeting_link.is_some() {
        param_count += 1;
        query.push_str(&format!(", meeting_link = ${param_count}"));
    }
    if input.interviewer_name.is_some() {
        param_count += 1;
        query.push_str(&format!(", interviewer_name = ${param_count}"));
    }
    if input.interviewer_email.is_some() {
        param_count += 1;
        query.push_str(&format!(", interviewer_email = ${param_count}"));
    }
    if input.notes.is_some() {
        param_count += 1;
        query.push_str(&format!(", notes = ${param_count}"));
    }
    if input.status.is_some() {
        param_count += 1;
        query.push_str(&format!(", status = ${param_count}"));
    }

    query.push_str(" WHERE id = $1 AND user_id = $2");
    query
}

// ── Follow-up reminders ─────────────────────────────────────────────────────

const REMINDER_SELECT: &str = r#"
    SELECT f.id, f.user_id, f.application_id, f.reminder_type, f.scheduled_for,
           f.is_completed, f.notes, f.created_at, f.updated_at,
           a.company AS application_company, a.role AS application_role
    FROM follow_up_reminders f
    LEFT JOIN job_applications a ON a.id = f.application_id
"#;

pub async fn list_reminders(
    pool: &PgPool,
    session: &Session,
) -> Result<Vec<FollowUpReminderRow>, AppError> {
    let query = format!("{REMINDER_SELECT} WHERE f.user_id = $1 ORDER BY f.scheduled_for");
    let rows = sqlx::query_as::<_, FollowUpReminderRow>(&query)
        .bind(session.user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Reminders that are due (scheduled at or before now) and not yet completed.
pub async fn list_pending_reminders(
    pool: &PgPool,
    session: &Session,
) -> Result<Vec<FollowUpReminderRow>, AppError> {
    let query = format!(
        "{REMINDER_SELECT} WHERE f.user_id = $1 AND NOT f.is_completed \
         AND f.scheduled_for <= now() ORDER BY f.scheduled_for"
    );
    let rows = sqlx::query_as::<_, FollowUpReminderRow>(&query)
        .bind(session.user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create_reminder(
    pool: &PgPool,
    session: &Session,
    input: &CreateFollowUpReminder,
) -> Result<FollowUpReminderRow, AppError> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO follow_up_reminders (user_id, application_id, reminder_type, scheduled_for, notes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(session.user_id)
    .bind(input.application_id)
    .bind(input.reminder_type.as_str())
    .bind(input.scheduled_for)
    .bind(&input.notes)
    .fetch_one(pool)
    .await?;

    get_reminder(pool, session, id).await
}

pub async fn complete_reminder(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE follow_up_reminders SET is_completed = true, updated_at = now() WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(session.user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Reminder {id} not found")));
    }
    Ok(())
}

pub async fn delete_reminder(pool: &PgPool, session: &Session, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM follow_up_reminders WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(session.user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Reminder {id} not found")));
    }
    Ok(())
}

async fn get_reminder(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
) -> Result<FollowUpReminderRow, AppError> {
    let query = format!("{REMINDER_SELECT} WHERE f.id = $1 AND f.user_id = $2");
    let row = sqlx::query_as::<_, FollowUpReminderRow>(&query)
        .bind(id)
        .bind(session.user_id)
        .fetch_optional(pool)
        .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Reminder {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::InterviewStatus;

    #[test]
    fn test_interview_update_query_with_no_fields_touches_only_timestamp() {
        let query = interview_update_query(&UpdateInterviewSchedule::default());
        assert_eq!(
            query,
            "UPDATE interview_schedules SET updated_at = now() WHERE id = $1 AND user_id = $2"
        );
    }

    #[test]
    fn test_interview_update_query_numbers_fields_in_declaration_order() {
        let input = UpdateInterviewSchedule {
            duration_minutes: Some(45),
            status: Some(InterviewStatus::Completed),
            ..Default::default()
        };
        assert_eq!(
            interview_update_query(&input),
            "UPDATE interview_schedules SET updated_at = now(), duration_minutes = $3, \
             status = $4 WHERE id = $1 AND user_id = $2"
        );
    }
}
