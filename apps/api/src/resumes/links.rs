//! Application ↔ resume links. Attach verifies that both ends exist and
//! belong to the caller before inserting; the unique pair constraint makes a
//! repeated attach a no-op instead of a second link.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::sessions::Session;
use crate::errors::AppError;
use crate::models::application::JobApplicationRow;
use crate::models::resume::{ApplicationWithResumes, ResumeLinkRow, ResumeRow};

pub async fn attach(
    pool: &PgPool,
    session: &Session,
    application_id: Uuid,
    resume_id: Uuid,
) -> Result<(), AppError> {
    let owns_application: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM job_applications WHERE id = $1 AND user_id = $2)",
    )
    .bind(application_id)
    .bind(session.user_id)
    .fetch_one(pool)
    .await?;
    if !owns_application {
        return Err(AppError::Link(format!(
            "Application {application_id} not found"
        )));
    }

    let owns_resume: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM resumes WHERE id = $1 AND user_id = $2)",
    )
    .bind(resume_id)
    .bind(session.user_id)
    .fetch_one(pool)
    .await?;
    if !owns_resume {
        return Err(AppError::Link(format!("Resume {resume_id} not found")));
    }

    sqlx::query(
        "INSERT INTO application_resumes (application_id, resume_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(application_id)
    .bind(resume_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Removes the link. Zero rows affected is success: detaching a link that
/// never existed leaves the link set unchanged.
pub async fn detach(
    pool: &PgPool,
    session: &Session,
    application_id: Uuid,
    resume_id: Uuid,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        DELETE FROM application_resumes
        WHERE application_id = $1 AND resume_id = $2
          AND application_id IN (SELECT id FROM job_applications WHERE user_id = $3)
        "#,
    )
    .bind(application_id)
    .bind(resume_id)
    .bind(session.user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Resumes currently linked to the application, oldest link first. Empty for
/// an unknown application rather than an error.
pub async fn list_attached(
    pool: &PgPool,
    session: &Session,
    application_id: Uuid,
) -> Result<Vec<ResumeRow>, AppError> {
    let rows = sqlx::query_as::<_, ResumeRow>(
        r#"
        SELECT r.*
        FROM application_resumes ar
        JOIN resumes r ON r.id = ar.resume_id
        WHERE ar.application_id = $1 AND r.user_id = $2
        ORDER BY ar.created_at
        "#,
    )
    .bind(application_id)
    .bind(session.user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every application of the user, newest first, each carrying its attached
/// resumes. Two queries (applications, then the link join) flattened in
/// memory by `flatten_attached`.
pub async fn list_with_attached(
    pool: &PgPool,
    session: &Session,
) -> Result<Vec<ApplicationWithResumes>, AppError> {
    let applications = crate::applications::store::list_applications(pool, session).await?;

    let links = sqlx::query_as::<_, ResumeLinkRow>(
        r#"
        SELECT ar.application_id,
               r.id AS resume_id, r.user_id, r.name, r.file_name, r.file_path,
               r.file_size, r.file_type, r.version, r.is_default, r.description,
               r.created_at, r.updated_at
        FROM application_resumes ar
        JOIN job_applications a ON a.id = ar.application_id
        LEFT JOIN resumes r ON r.id = ar.resume_id
        WHERE a.user_id = $1
        ORDER BY ar.created_at
        "#,
    )
    .bind(session.user_id)
    .fetch_all(pool)
    .await?;

    Ok(flatten_attached(applications, links))
}

/// Groups join rows under their application, dropping rows whose resume side
/// is missing. Application order is preserved; an application with no links
/// gets an empty list.
fn flatten_attached(
    applications: Vec<JobApplicationRow>,
    links: Vec<ResumeLinkRow>,
) -> Vec<ApplicationWithResumes> {
    let mut by_application: HashMap<Uuid, Vec<ResumeRow>> = HashMap::new();
    for link in links {
        let application_id = link.application_id;
        if let Some(resume) = link.into_resume() {
            by_application.entry(application_id).or_default().push(resume);
        }
    }

    applications
        .into_iter()
        .map(|application| {
            let attached_resumes = by_application.remove(&application.id).unwrap_or_default();
            ApplicationWithResumes {
                application,
                attached_resumes,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_app(id: Uuid) -> JobApplicationRow {
        let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        JobApplicationRow {
            id,
            user_id: Uuid::new_v4(),
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            portal_url: None,
            status: "applied".to_string(),
            deadline: None,
            notes: None,
            salary: None,
            location: None,
            application_date: None,
            job_type: "full-time".to_string(),
            source: None,
            priority: "medium".to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    fn make_link(application_id: Uuid, resume_id: Option<Uuid>) -> ResumeLinkRow {
        let stamp = resume_id.map(|_| Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        ResumeLinkRow {
            application_id,
            resume_id,
            user_id: resume_id.map(|_| Uuid::new_v4()),
            name: resume_id.map(|_| "Main CV".to_string()),
            file_name: resume_id.map(|_| "cv.pdf".to_string()),
            file_path: resume_id.map(|_| "u/1_cv.pdf".to_string()),
            file_size: resume_id.map(|_| 2048),
            file_type: resume_id.map(|_| "application/pdf".to_string()),
            version: resume_id.map(|_| "v1".to_string()),
            is_default: resume_id.map(|_| false),
            description: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn test_flatten_groups_links_under_their_application() {
        let app_a = Uuid::new_v4();
        let app_b = Uuid::new_v4();
        let resume_1 = Uuid::new_v4();
        let resume_2 = Uuid::new_v4();

        let flattened = flatten_attached(
            vec![make_app(app_a), make_app(app_b)],
            vec![
                make_link(app_a, Some(resume_1)),
                make_link(app_a, Some(resume_2)),
                make_link(app_b, Some(resume_1)),
            ],
        );

        assert_eq!(flattened.len(), 2);
        assert_eq!(flattened[0].attached_resumes.len(), 2);
        assert_eq!(flattened[1].attached_resumes.len(), 1);
        assert_eq!(flattened[1].attached_resumes[0].id, resume_1);
    }

    #[test]
    fn test_flatten_drops_dangling_links() {
        let app = Uuid::new_v4();
        let flattened = flatten_attached(vec![make_app(app)], vec![make_link(app, None)]);
        assert_eq!(flattened.len(), 1);
        assert!(flattened[0].attached_resumes.is_empty());
    }

    #[test]
    fn test_flatten_preserves_application_order_without_links() {
        let app_a = Uuid::new_v4();
        let app_b = Uuid::new_v4();
        let flattened = flatten_attached(vec![make_app(app_a), make_app(app_b)], vec![]);
        let ids: Vec<Uuid> = flattened.iter().map(|f| f.application.id).collect();
        assert_eq!(ids, vec![app_a, app_b]);
        assert!(flattened.iter().all(|f| f.attached_resumes.is_empty()));
    }
}
