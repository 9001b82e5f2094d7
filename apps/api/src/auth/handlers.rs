use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::events::AuthEvent;
use crate::auth::sessions::{self, Session};
use crate::errors::AppError;
use crate::models::user::{UpdateProfile, User};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: Uuid,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(AppError::Validation(
            "a valid email address is required".to_string(),
        ));
    }
    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }

    let (user, session) = sessions::signup(
        &state.db,
        state.config.session_ttl_hours,
        &req.email,
        &req.password,
        req.full_name.as_deref(),
    )
    .await?;

    state
        .auth_events
        .publish(AuthEvent::SignedIn { user_id: user.id });

    Ok(Json(AuthResponse {
        token: session.token,
        expires_at: session.expires_at,
        user,
    }))
}

/// POST /api/v1/auth/signin
pub async fn handle_signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (user, session) = sessions::signin(
        &state.db,
        state.config.session_ttl_hours,
        &req.email,
        &req.password,
    )
    .await?;

    state
        .auth_events
        .publish(AuthEvent::SignedIn { user_id: user.id });

    Ok(Json(AuthResponse {
        token: session.token,
        expires_at: session.expires_at,
        user,
    }))
}

/// POST /api/v1/auth/signout
pub async fn handle_signout(
    State(state): State<AppState>,
    session: Session,
) -> Result<StatusCode, AppError> {
    sessions::signout(&state.db, &session).await?;

    state.auth_events.publish(AuthEvent::SignedOut {
        user_id: session.user_id,
    });

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<User>, AppError> {
    let user = sessions::get_user(&state.db, &session).await?;
    Ok(Json(user))
}

/// PATCH /api/v1/auth/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<UpdateProfile>,
) -> Result<Json<User>, AppError> {
    let user = sessions::update_profile(&state.db, &session, input).await?;
    Ok(Json(user))
}
