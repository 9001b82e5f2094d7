//! Reminders generated when an application is created with an application
//! date: a follow-up a week out, a status check two weeks out, and one
//! notification at the follow-up date.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::auth::sessions::Session;
use crate::errors::AppError;
use crate::models::application::JobApplicationRow;
use crate::models::notification::{NotificationType, ReminderType};

/// Target instants for the generated reminders: application date + 7 days
/// and + 14 days, both at UTC midnight.
pub fn auto_reminder_dates(application_date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let at_midnight = |date: NaiveDate| date.and_time(NaiveTime::MIN).and_utc();
    (
        at_midnight(application_date + Duration::days(7)),
        at_midnight(application_date + Duration::days(14)),
    )
}

/// Inserts the two follow-up reminders and the notification in one
/// transaction; a failure on any insert rolls back the others. Applications
/// without an application date get nothing.
pub async fn create_auto_reminders(
    pool: &PgPool,
    session: &Session,
    application: &JobApplicationRow,
) -> Result<(), AppError> {
    let Some(application_date) = application.application_date else {
        return Ok(());
    };
    let (follow_up_at, status_check_at) = auto_reminder_dates(application_date);

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO follow_up_reminders (user_id, application_id, reminder_type, scheduled_for, notes)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(session.user_id)
    .bind(application.id)
    .bind(ReminderType::FollowUp.as_str())
    .bind(follow_up_at)
    .bind("Follow up on application status")
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO follow_up_reminders (user_id, application_id, reminder_type, scheduled_for, notes)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(session.user_id)
    .bind(application.id)
    .bind(ReminderType::StatusCheck.as_str())
    .bind(status_check_at)
    .bind("Check application status and consider next steps")
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO notifications (user_id, application_id, type, title, message, scheduled_for)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(session.user_id)
    .bind(application.id)
    .bind(NotificationType::FollowUp.as_str())
    .bind("Follow-up Reminder")
    .bind("Time to follow up on your application")
    .bind(follow_up_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Created auto reminders for application {} (follow-up {}, status check {})",
        application.id, follow_up_at, status_check_at
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_reminder_dates_one_and_two_weeks_out() {
        let (follow_up, status_check) = auto_reminder_dates(date(2024, 1, 1));
        assert_eq!(follow_up, Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap());
        assert_eq!(
            status_check,
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_reminder_dates_roll_over_month_end() {
        let (follow_up, status_check) = auto_reminder_dates(date(2024, 1, 25));
        assert_eq!(follow_up, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(
            status_check,
            Utc.with_ymd_and_hms(2024, 2, 8, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_reminder_dates_handle_leap_february() {
        let (follow_up, status_check) = auto_reminder_dates(date(2024, 2, 22));
        assert_eq!(follow_up, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
        assert_eq!(
            status_check,
            Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap()
        );
    }
}
