use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    FollowUp,
    Interview,
    Deadline,
    General,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::FollowUp => "follow_up",
            NotificationType::Interview => "interview",
            NotificationType::Deadline => "deadline",
            NotificationType::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    Phone,
    Video,
    InPerson,
    Technical,
    Hr,
    Final,
}

impl InterviewType {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewType::Phone => "phone",
            InterviewType::Video => "video",
            InterviewType::InPerson => "in_person",
            InterviewType::Technical => "technical",
            InterviewType::Hr => "hr",
            InterviewType::Final => "final",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
}

impl InterviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
            InterviewStatus::Rescheduled => "rescheduled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    Initial,
    FollowUp,
    ThankYou,
    StatusCheck,
}

impl ReminderType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReminderType::Initial => "initial",
            ReminderType::FollowUp => "follow_up",
            ReminderType::ThankYou => "thank_you",
            ReminderType::StatusCheck => "status_check",
        }
    }
}

/// A scheduled reminder surfaced to the user. `application_company`/`role`
/// are projected from the owning application on list queries and stay `None`
/// for general notifications.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub application_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub scheduled_for: DateTime<Utc>,
    pub is_read: bool,
    pub is_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub application_company: Option<String>,
    pub application_role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewScheduleRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub application_id: Uuid,
    pub interview_type: String,
    pub scheduled_date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub interviewer_name: Option<String>,
    pub interviewer_email: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub application_company: Option<String>,
    pub application_role: Option<String>,
}

/// A dated task tied to one application, distinct from a notification.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FollowUpReminderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub application_id: Uuid,
    pub reminder_type: String,
    pub scheduled_for: DateTime<Utc>,
    pub is_completed: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub application_company: Option<String>,
    pub application_role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotification {
    pub application_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub scheduled_for: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInterviewSchedule {
    pub application_id: Uuid,
    pub interview_type: InterviewType,
    pub scheduled_date: DateTime<Utc>,
    /// Defaults to 60 when omitted.
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub interviewer_name: Option<String>,
    pub interviewer_email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInterviewSchedule {
    pub interview_type: Option<InterviewType>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub interviewer_name: Option<String>,
    pub interviewer_email: Option<String>,
    pub notes: Option<String>,
    pub status: Option<InterviewStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFollowUpReminder {
    pub application_id: Uuid,
    pub reminder_type: ReminderType,
    pub scheduled_for: DateTime<Utc>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interview_type_in_person_label() {
        assert_eq!(InterviewType::InPerson.as_str(), "in_person");
        let parsed: InterviewType = serde_json::from_str("\"in_person\"").unwrap();
        assert_eq!(parsed, InterviewType::InPerson);
    }

    #[test]
    fn test_notification_type_field_serializes_as_type() {
        let payload = serde_json::json!({
            "application_id": null,
            "type": "deadline",
            "title": "Apply by Friday",
            "message": "Acme portal closes soon",
            "scheduled_for": "2024-03-01T09:00:00Z"
        });
        let parsed: CreateNotification = serde_json::from_value(payload).unwrap();
        assert_eq!(parsed.notification_type, NotificationType::Deadline);
    }

    #[test]
    fn test_reminder_type_labels() {
        assert_eq!(ReminderType::StatusCheck.as_str(), "status_check");
        assert_eq!(ReminderType::ThankYou.as_str(), "thank_you");
    }
}
