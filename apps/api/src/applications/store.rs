//! Data access for job applications. Every function takes the pool and the
//! caller's session explicitly; all queries scope by `user_id`, so another
//! user's rows are indistinguishable from missing rows.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::sessions::Session;
use crate::errors::AppError;
use crate::models::application::{CreateApplication, JobApplicationRow, UpdateApplication};

pub async fn list_applications(
    pool: &PgPool,
    session: &Session,
) -> Result<Vec<JobApplicationRow>, AppError> {
    let rows = sqlx::query_as::<_, JobApplicationRow>(
        "SELECT * FROM job_applications WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(session.user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_application(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
) -> Result<JobApplicationRow, AppError> {
    let row = sqlx::query_as::<_, JobApplicationRow>(
        "SELECT * FROM job_applications WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(session.user_id)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

pub async fn create_application(
    pool: &PgPool,
    session: &Session,
    input: &CreateApplication,
) -> Result<JobApplicationRow, AppError> {
    let row = sqlx::query_as::<_, JobApplicationRow>(
        r#"
        INSERT INTO job_applications
            (user_id, company, role, portal_url, status, deadline, notes,
             salary, location, application_date, job_type, source, priority)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(session.user_id)
    .bind(&input.company)
    .bind(&input.role)
    .bind(&input.portal_url)
    .bind(input.status.as_str())
    .bind(input.deadline)
    .bind(&input.notes)
    .bind(&input.salary)
    .bind(&input.location)
    .bind(input.application_date)
    .bind(input.job_type.as_str())
    .bind(&input.source)
    .bind(input.priority.as_str())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Applies only the fields present in `input`; `updated_at` is refreshed on
/// every call. The bind order below must mirror the clause order produced by
/// `update_query`.
pub async fn update_application(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
    input: UpdateApplication,
) -> Result<JobApplicationRow, AppError> {
    let query = update_query(&input);

    let mut q = sqlx::query_as::<_, JobApplicationRow>(&query)
        .bind(id)
        .bind(session.user_id);

    if let Some(company) = input.company {
        q = q.bind(company);
    }
    if let Some(role) = input.role {
        q = q.bind(role);
    }
    if let Some(portal_url) = input.portal_url {
        q = q.bind(portal_url);
    }
    if let Some(status) = input.status {
        q = q.bind(status.as_str());
    }
    if let Some(deadline) = input.deadline {
        q = q.bind(deadline);
    }
    if let Some(notes) = input.notes {
        q = q.bind(notes);
    }
    if let Some(salary) = input.salary {
        q = q.bind(salary);
    }
    if let Some(location) = input.location {
        q = q.bind(location);
    }
    if let Some(application_date) = input.application_date {
        q = q.bind(application_date);
    }
    if let Some(job_type) = input.job_type {
        q = q.bind(job_type.as_str());
    }
    if let Some(source) = input.source {
        q = q.bind(source);
    }
    if let Some(priority) = input.priority {
        q = q.bind(priority.as_str());
    }

    let row = q.fetch_optional(pool).await?;
    row.ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

pub async fn delete_application(
    pool: &PgPool,
    session: &Session,
    id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM job_applications WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(session.user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Application {id} not found")));
    }
    Ok(())
}

/// Builds the UPDATE statement for the fields present in `input`. Parameters
/// $1 and $2 are reserved for id and user_id; optional fields number from $3
/// in declaration order.
fn update_query(input: &UpdateApplication) -> String {
    let mut query = String::from("UPDATE job_applications SET updated_at = now()");
    let mut param_count = 2;

    if input.company.is_some() {
        param_count += 1;
        query.push_str(&format!(", company = ${param_count}"));
    }
    if input.role.is_some() {
        param_count += 1;
        query.push_str(&format!(", role = ${param_count}"));
    }
    if input.portal_url.is_some() {
        param_count += 1;
        query.push_str(&format!(", portal_url = ${param_count}"));
    }
    if input.status.is_some() {
        param_count += 1;
        query.push_str(&format!(", status = ${param_count}"));
    }
    if input.deadline.is_some() {
        param_count += 1;
        query.push_str(&format!(", deadline = ${param_count}"));
    }
    if input.notes.is_some() {
        param_count += 1;
        query.push_str(&format!(", notes = ${param_count}"));
    }
    if input.salary.is_some() {
        param_count += 1;
        query.push_str(&format!(", salary = ${param_count}"));
    }
    if input.location.is_some() {
        param_count += 1;
        query.push_str(&format!(", location = ${param_count}"));
    }
    if input.application_date.is_some() {
        param_count += 1;
        query.push_str(&format!(", application_date = ${param_count}"));
    }
    if input.job_type.is_some() {
        param_count += 1;
        query.push_str(&format!(", job_type = ${param_count}"));
    }
    if input.source.is_some() {
        param_count += 1;
        query.push_str(&format!(", source = ${param_count}"));
    }
    if input.priority.is_some() {
        param_count += 1;
        query.push_str(&format!(", priority = ${param_count}"));
    }

    query.push_str(" WHERE id = $1 AND user_id = $2 RETURNING *");
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationStatus;

    #[test]
    fn test_update_query_with_no_fields_touches_only_timestamp() {
        let query = update_query(&UpdateApplication::default());
        assert_eq!(
            query,
            "UPDATE job_applications SET updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING *"
        );
    }

    #[test]
    fn test_update_query_numbers_fields_in_declaration_order() {
        let input = UpdateApplication {
            role: Some("Staff Engineer".to_string()),
            status: Some(ApplicationStatus::Interview),
            notes: Some("phone screen done".to_string()),
            ..Default::default()
        };
        let query = update_query(&input);
        assert_eq!(
            query,
            "UPDATE job_applications SET updated_at = now(), role = $3, \
             status = $4, notes = $5 WHERE id = $1 AND user_id = $2 RETURNING *"
        );
    }
}
