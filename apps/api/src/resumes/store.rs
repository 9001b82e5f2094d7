//! Resume metadata rows plus the blob holding the actual file. The row's
//! `file_path` is the object key; blob and row are written in that order so
//! a failed insert can still clean up its blob.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::sessions::Session;
use crate::errors::AppError;
use crate::models::resume::{ResumeRow, UpdateResume};
use crate::storage::BlobStore;

/// A parsed multipart upload, ready to persist.
pub struct NewUpload {
    pub name: String,
    pub description: Option<String>,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

pub async fn upload_resume(
    pool: &PgPool,
    blob: &dyn BlobStore,
    session: &Session,
    upload: NewUpload,
) -> Result<ResumeRow, AppError> {
    let key = object_key(session.user_id, Utc::now(), &upload.file_name);
    let file_size = upload.bytes.len() as i64;

    blob.put(&key, upload.bytes, &upload.content_type).await?;

    let inserted = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (user_id, name, file_name, file_path, file_size, file_type, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(session.user_id)
    .bind(&upload.name)
    .bind(&upload.file_name)
    .bind(&key)
    .bind(file_size)
    .bind(&upload.content_type)
    .bind(&upload.description)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(row) => {
            info!(
                "Uploaded resume {} ({}) for user {}",
                row.id,
                format_file_size(row.file_size),
                session.user_id
            );
            Ok(row)
        }
        Err(e) => {
            // The blob is already stored; drop it so the failed insert
            // leaves nothing behind.
            if let Err(remove_err) = blob.remove(&key).await {
                warn!("Failed to remove orphaned blob {key}: {remove_err}");
            }
            Err(e.into())
        }
    }
}

pub async fn list_resumes(pool: &PgPool, session: &Session) -> Result<Vec<ResumeRow>, AppError> {
    let rows = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(session.user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Metadata-only update (name, description). The default flag is excluded;
/// `set_default_resume` is the only writer of that column.
pub async fn update_resume(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
    input: UpdateResume,
) -> Result<ResumeRow, AppError> {
    let mut query = String::from("UPDATE resumes SET updated_at = now()");
    let mut param_count = 2;

    if input.name.is_some() {
        param_count += 1;
        query.push_str(&format!(", name = ${param_count}"));
    }
    if input.description.is_some() {
        param_count += 1;
        query.push_str(&format!(", description = ${param_count}"));
    }
    query.push_str(" WHERE id = $1 AND user_id = $2 RETURNING *");

    let mut q = sqlx::query_as::<_, ResumeRow>(&query)
        .bind(id)
        .bind(session.user_id);
    if let Some(name) = input.name {
        q = q.bind(name);
    }
    if let Some(description) = input.description {
        q = q.bind(description);
    }

    let row = q.fetch_optional(pool).await?;
    row.ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// Clears every default flag for the user, then sets the chosen one, in a
/// single transaction. A concurrent call therefore still ends with exactly
/// one default; an unknown id rolls the clearing back too.
pub async fn set_default_resume(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
) -> Result<ResumeRow, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE resumes SET is_default = false, updated_at = now() WHERE user_id = $1 AND is_default")
        .bind(session.user_id)
        .execute(&mut *tx)
        .await?;

    let row = sqlx::query_as::<_, ResumeRow>(
        "UPDATE resumes SET is_default = true, updated_at = now() WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(session.user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        // dropping the transaction rolls back the cleared flags
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    };

    tx.commit().await?;
    Ok(row)
}

/// Deletes the metadata row; the blob removal is best-effort and never fails
/// the operation. Attachment links go away via the FK cascade.
pub async fn delete_resume(
    pool: &PgPool,
    blob: &dyn BlobStore,
    session: &Session,
    id: Uuid,
) -> Result<(), AppError> {
    let row = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(session.user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    if let Err(e) = blob.remove(&row.file_path).await {
        warn!("Failed to delete blob {} for resume {id}: {e}", row.file_path);
    }

    sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(session.user_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Object key for an uploaded file: `{user_id}/{millis}_{file_name}`. The
/// millisecond prefix keeps repeated uploads of the same file name apart.
fn object_key(user_id: Uuid, now: DateTime<Utc>, file_name: &str) -> String {
    format!("{}/{}_{}", user_id, now.timestamp_millis(), file_name)
}

/// Human-readable file size: 1024-based units, at most two decimals,
/// trailing zeros trimmed ("1 KB", "1.5 MB").
pub fn format_file_size(bytes: i64) -> String {
    if bytes <= 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = (((bytes as f64).ln() / 1024_f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rendered = format!("{value:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{rendered} {}", UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_object_key_is_user_scoped_with_millis_prefix() {
        let user_id = Uuid::nil();
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            object_key(user_id, now, "cv.pdf"),
            "00000000-0000-0000-0000-000000000000/1700000000123_cv.pdf"
        );
    }

    #[test]
    fn test_format_file_size_zero() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn test_format_file_size_whole_units_trim_decimals() {
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_format_file_size_fractional() {
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1100), "1.07 KB");
        assert_eq!(format_file_size(2_621_440), "2.5 MB");
    }
}
