//! Export routes: active-employee snapshots as CSV, XLSX, and PDF

use axum::{
    Extension,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::{
    error::{ApiError, ApiResult},
    export::{render_csv, render_pdf, render_xlsx},
    middleware::AuthUser,
    models::Employee,
    state::AppState,
};

async fn active_employees(state: &AppState) -> ApiResult<Vec<Employee>> {
    state.employee_repository.active_for_export().await.map_err(|e| {
        error!("Failed to fetch employees for export: {}", e);
        ApiError::Internal
    })
}

fn attachment(content_type: &str, filename: &str, body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Export active employees as UTF-8 CSV with a BOM
pub async fn csv(State(state): State<AppState>) -> ApiResult<Response> {
    let employees = active_employees(&state).await?;
    let body = render_csv(&employees).map_err(|e| {
        error!("Failed to render CSV export: {}", e);
        ApiError::Internal
    })?;

    Ok(attachment("text/csv; charset=utf-8", "employees.csv", body))
}

/// Export active employees as a styled XLSX workbook
pub async fn excel(State(state): State<AppState>) -> ApiResult<Response> {
    let employees = active_employees(&state).await?;
    let body = render_xlsx(&employees).map_err(|e| {
        error!("Failed to render XLSX export: {}", e);
        ApiError::Internal
    })?;

    Ok(attachment(
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "employees.xlsx",
        body,
    ))
}

/// Export active employees as a tabular PDF report
pub async fn pdf(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
) -> ApiResult<Response> {
    let employees = active_employees(&state).await?;
    let body = render_pdf(&employees, &identity.username).map_err(|e| {
        error!("Failed to render PDF export: {}", e);
        ApiError::Internal
    })?;

    Ok(attachment("application/pdf", "employees.pdf", body))
}
