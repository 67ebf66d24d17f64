//! Dashboard aggregation routes

use axum::{Json, extract::State, response::IntoResponse};
use tracing::error;

use crate::{error::ApiError, state::AppState};

/// Headline counts and company-wide salary average
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.employee_repository.stats().await.map_err(|e| {
        error!("Failed to compute dashboard stats: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(stats))
}

/// Headcount per department
pub async fn department_data(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let data = state
        .employee_repository
        .department_breakdown()
        .await
        .map_err(|e| {
            error!("Failed to compute department breakdown: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(data))
}

/// Average salary per department
pub async fn salary_data(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let data = state
        .employee_repository
        .salary_by_department()
        .await
        .map_err(|e| {
            error!("Failed to compute salary breakdown: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(data))
}

/// Five most recent audit log entries
pub async fn recent_activities(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.audit_log.recent(5).await.map_err(|e| {
        error!("Failed to fetch recent activities: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(entries))
}
