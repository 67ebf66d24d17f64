//! Employee record lifecycle routes

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::error;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::{EmployeeListQuery, EmployeeStatus, NewEmployeeRequest, UpdateEmployeeRequest},
    state::AppState,
    validation,
};

/// Add a new employee
pub async fn add(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Json(payload): Json<NewEmployeeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_new_employee(&payload).map_err(ApiError::Validation)?;

    let existing = state
        .employee_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up email: {}", e);
            ApiError::Internal
        })?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let employee = state
        .employee_repository
        .create(&payload)
        .await
        .map_err(|e| {
            error!("Failed to create employee: {}", e);
            ApiError::Internal
        })?;

    state
        .audit_log
        .record(
            "Added new employee",
            &identity.username,
            Some(&employee.id),
            Some(&employee.name),
        )
        .await;
    state.notifier.employee_added(&employee.name, &employee.email);

    Ok((StatusCode::CREATED, Json(employee)))
}

/// Paginated, filtered, sorted employee listing; a bare sequence, the
/// total lives behind the count endpoint
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<EmployeeListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let employees = state.employee_repository.list(&query).await.map_err(|e| {
        error!("Failed to list employees: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(employees))
}

/// Count of records matching the same filters as the listing
pub async fn count(
    State(state): State<AppState>,
    Query(query): Query<EmployeeListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let total = state.employee_repository.count(&query).await.map_err(|e| {
        error!("Failed to count employees: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(json!({"count": total})))
}

/// Fetch one employee by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = state
        .employee_repository
        .find_by_id(&id)
        .await
        .map_err(|e| {
            error!("Failed to fetch employee: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    Ok(Json(employee))
}

/// Partial update of an employee record
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_employee_update(&payload).map_err(ApiError::Validation)?;

    let current = state
        .employee_repository
        .find_by_id(&id)
        .await
        .map_err(|e| {
            error!("Failed to fetch employee: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    if let Some(email) = &payload.email {
        let existing = state
            .employee_repository
            .find_by_email(email)
            .await
            .map_err(|e| {
                error!("Failed to look up email: {}", e);
                ApiError::Internal
            })?;
        if existing.as_ref().is_some_and(|other| other.id != id) {
            return Err(ApiError::Conflict("Email already exists".to_string()));
        }
    }

    let employee = state
        .employee_repository
        .update(&id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update employee: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    state
        .audit_log
        .record(
            "Updated employee details",
            &identity.username,
            Some(&employee.id),
            Some(&current.name),
        )
        .await;
    state.notifier.employee_updated(&employee.name, &employee.email);

    Ok(Json(employee))
}

/// Soft delete: the record is retained with inactive status
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = state
        .employee_repository
        .find_by_id(&id)
        .await
        .map_err(|e| {
            error!("Failed to fetch employee: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    state
        .employee_repository
        .set_status(&id, EmployeeStatus::Inactive)
        .await
        .map_err(|e| {
            error!("Failed to delete employee: {}", e);
            ApiError::Internal
        })?;

    state
        .audit_log
        .record(
            "Deleted employee",
            &identity.username,
            Some(&employee.id),
            Some(&employee.name),
        )
        .await;

    Ok(Json(json!({"message": "Employee deleted successfully"})))
}

/// Reverse a soft delete
pub async fn restore(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = state
        .employee_repository
        .find_by_id(&id)
        .await
        .map_err(|e| {
            error!("Failed to fetch employee: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    state
        .employee_repository
        .set_status(&id, EmployeeStatus::Active)
        .await
        .map_err(|e| {
            error!("Failed to restore employee: {}", e);
            ApiError::Internal
        })?;

    state
        .audit_log
        .record(
            "Restored employee",
            &identity.username,
            Some(&employee.id),
            Some(&employee.name),
        )
        .await;

    Ok(Json(json!({"message": "Employee restored successfully"})))
}

/// Distinct department names across all records
pub async fn departments(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let departments = state
        .employee_repository
        .distinct_departments()
        .await
        .map_err(|e| {
            error!("Failed to list departments: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(json!({"departments": departments})))
}
