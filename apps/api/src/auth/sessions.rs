//! Accounts and bearer-token sessions. Passwords are hashed with argon2id;
//! tokens are random UUIDs stored server-side with an expiry, so signout and
//! expiry both revoke immediately.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{SessionRow, UpdateProfile, User};
use crate::state::AppState;

/// The authenticated caller, resolved from the `Authorization` header. Every
/// facade function takes this explicitly; it is the only source of the
/// owning user id for reads and writes.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub token: Uuid,
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer)
            .ok_or(AppError::Unauthorized)?;

        session_from_token(&state.db, token).await
    }
}

/// Extracts the token from an `Authorization` header value. Only the exact
/// `Bearer <uuid>` shape is accepted.
fn parse_bearer(header: &str) -> Option<Uuid> {
    header.strip_prefix("Bearer ")?.trim().parse().ok()
}

/// Looks the token up and checks expiry. Expired sessions are deleted on
/// first rejected use rather than by a background sweep.
pub async fn session_from_token(pool: &PgPool, token: Uuid) -> Result<Session, AppError> {
    let row: Option<SessionRow> = sqlx::query_as("SELECT * FROM sessions WHERE token = $1")
        .bind(token)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Err(AppError::Unauthorized);
    };
    if row.expires_at <= Utc::now() {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(pool)
            .await?;
        return Err(AppError::Unauthorized);
    }

    Ok(Session {
        token: row.token,
        user_id: row.user_id,
    })
}

/// `users` row including the hash. Never leaves this module.
#[derive(FromRow)]
struct CredentialRow {
    id: Uuid,
    email: String,
    password_hash: String,
    full_name: Option<String>,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            avatar_url: self.avatar_url,
            created_at: self.created_at,
        }
    }
}

pub async fn signup(
    pool: &PgPool,
    ttl_hours: i64,
    email: &str,
    password: &str,
    full_name: Option<&str>,
) -> Result<(User, SessionRow), AppError> {
    let email = email.trim().to_lowercase();

    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&email)
        .fetch_one(pool)
        .await?;
    if taken {
        return Err(AppError::Validation(
            "email is already registered".to_string(),
        ));
    }

    let password_hash = hash_password(password)?;
    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (email, password_hash, full_name)
        VALUES ($1, $2, $3)
        RETURNING id, email, full_name, avatar_url, created_at
        "#,
    )
    .bind(&email)
    .bind(&password_hash)
    .bind(full_name)
    .fetch_one(pool)
    .await?;

    let session = issue_session(pool, ttl_hours, user.id).await?;
    Ok((user, session))
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn signin(
    pool: &PgPool,
    ttl_hours: i64,
    email: &str,
    password: &str,
) -> Result<(User, SessionRow), AppError> {
    let row: Option<CredentialRow> = sqlx::query_as(
        "SELECT id, email, password_hash, full_name, avatar_url, created_at FROM users WHERE email = $1",
    )
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Err(AppError::Unauthorized);
    };
    if !verify_password(password, &row.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let session = issue_session(pool, ttl_hours, row.id).await?;
    Ok((row.into_user(), session))
}

/// Revokes the session. Revoking one that is already gone is fine.
pub async fn signout(pool: &PgPool, session: &Session) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(session.token)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_user(pool: &PgPool, session: &Session) -> Result<User, AppError> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, email, full_name, avatar_url, created_at FROM users WHERE id = $1",
    )
    .bind(session.user_id)
    .fetch_optional(pool)
    .await?;
    // the FK from sessions makes a missing user unreachable in practice
    user.ok_or(AppError::Unauthorized)
}

pub async fn update_profile(
    pool: &PgPool,
    session: &Session,
    input: UpdateProfile,
) -> Result<User, AppError> {
    let user: User = sqlx::query_as(
        r#"
        UPDATE users
        SET full_name = COALESCE($2, full_name),
            avatar_url = COALESCE($3, avatar_url)
        WHERE id = $1
        RETURNING id, email, full_name, avatar_url, created_at
        "#,
    )
    .bind(session.user_id)
    .bind(input.full_name)
    .bind(input.avatar_url)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

async fn issue_session(
    pool: &PgPool,
    ttl_hours: i64,
    user_id: Uuid,
) -> Result<SessionRow, AppError> {
    let row: SessionRow = sqlx::query_as(
        "INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(Utc::now() + Duration::hours(ttl_hours))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored password hash unreadable: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_hashing_salts_per_call() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_parse_bearer_accepts_uuid_token() {
        let token = Uuid::new_v4();
        assert_eq!(parse_bearer(&format!("Bearer {token}")), Some(token));
    }

    #[test]
    fn test_parse_bearer_rejects_other_shapes() {
        let token = Uuid::new_v4();
        assert_eq!(parse_bearer(""), None);
        assert_eq!(parse_bearer("Basic dXNlcjpwdw=="), None);
        assert_eq!(parse_bearer("Bearer not-a-uuid"), None);
        // scheme is case-sensitive
        assert_eq!(parse_bearer(&format!("bearer {token}")), None);
    }
}
