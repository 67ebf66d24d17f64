//! Employee model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Record state; "delete" is a soft transition to inactive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
        }
    }
}

/// Employee entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: String,
    pub emp_code: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    pub salary: f64,
    pub join_date: String,
    pub phone: String,
    pub address: String,
    /// Reference to an uploaded blob; storage mechanics are external
    pub photo: Option<String>,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New employee creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployeeRequest {
    pub name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    pub salary: f64,
    pub join_date: String,
    pub phone: String,
    pub address: String,
    pub photo: Option<String>,
}

/// Partial employee update payload; only supplied fields are applied
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub salary: Option<f64>,
    pub join_date: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub photo: Option<String>,
    pub status: Option<EmployeeStatus>,
}

/// Query parameters for employee listing and counting
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeListQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
    /// Case-insensitive substring match against name, email, or emp_code
    pub search: Option<String>,
    /// Exact-match department filter
    pub department: Option<String>,
    /// Exact-match status filter
    pub status: Option<String>,
    /// Sort field (whitelisted to stored columns)
    pub sort_by: Option<String>,
    /// Sort order (asc or desc)
    pub sort_order: Option<String>,
}
