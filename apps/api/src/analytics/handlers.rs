use axum::{extract::State, Json};
use chrono::Utc;

use crate::analytics::engine::{
    compute_analytics, compute_dashboard_stats, AnalyticsSummary, DashboardStats,
};
use crate::applications::store;
use crate::auth::sessions::Session;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/analytics
pub async fn handle_get_analytics(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<AnalyticsSummary>, AppError> {
    let applications = store::list_applications(&state.db, &session).await?;
    Ok(Json(compute_analytics(&applications, Utc::now())))
}

/// GET /api/v1/analytics/stats
pub async fn handle_get_dashboard_stats(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<DashboardStats>, AppError> {
    let applications = store::list_applications(&state.db, &session).await?;
    Ok(Json(compute_dashboard_stats(&applications)))
}
