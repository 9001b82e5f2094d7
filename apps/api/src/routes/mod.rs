pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::analytics::handlers as analytics;
use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::reminders::handlers as reminders;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/signin", post(auth::handle_signin))
        .route("/api/v1/auth/signout", post(auth::handle_signout))
        .route("/api/v1/auth/me", get(auth::handle_me))
        .route("/api/v1/auth/profile", patch(auth::handle_update_profile))
        // Applications
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_create_application),
        )
        .route(
            "/api/v1/applications/with-resumes",
            get(applications::handle_list_with_resumes),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get_application)
                .patch(applications::handle_update_application)
                .delete(applications::handle_delete_application),
        )
        // Application ↔ resume links
        .route(
            "/api/v1/applications/:id/resumes",
            get(resumes::handle_list_attached),
        )
        .route(
            "/api/v1/applications/:id/resumes/:resume_id",
            post(resumes::handle_attach_resume).delete(resumes::handle_detach_resume),
        )
        // Analytics
        .route("/api/v1/analytics", get(analytics::handle_get_analytics))
        .route(
            "/api/v1/analytics/stats",
            get(analytics::handle_get_dashboard_stats),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_upload_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            patch(resumes::handle_update_resume).delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/default",
            post(resumes::handle_set_default_resume),
        )
        // Notifications
        .route(
            "/api/v1/notifications",
            get(reminders::handle_list_notifications).post(reminders::handle_create_notification),
        )
        .route(
            "/api/v1/notifications/read-all",
            post(reminders::handle_mark_all_notifications_read),
        )
        .route(
            "/api/v1/notifications/:id/read",
            post(reminders::handle_mark_notification_read),
        )
        .route(
            "/api/v1/notifications/:id",
            delete(reminders::handle_delete_notification),
        )
        // Interview schedules
        .route(
            "/api/v1/interviews",
            get(reminders::handle_list_interviews).post(reminders::handle_create_interview),
        )
        .route(
            "/api/v1/interviews/:id",
            patch(reminders::handle_update_interview).delete(reminders::handle_delete_interview),
        )
        // Follow-up reminders
        .route(
            "/api/v1/reminders",
            get(reminders::handle_list_reminders).post(reminders::handle_create_reminder),
        )
        .route(
            "/api/v1/reminders/:id/complete",
            post(reminders::handle_complete_reminder),
        )
        .route(
            "/api/v1/reminders/:id",
            delete(reminders::handle_delete_reminder),
        )
        .with_state(state)
}
