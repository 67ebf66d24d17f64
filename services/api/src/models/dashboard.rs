//! Dashboard aggregate models

use serde::Serialize;
use sqlx::FromRow;

/// Headline counters for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_employees: i64,
    pub active_employees: i64,
    pub department_count: i64,
    pub average_salary: f64,
}

/// Employee count per department
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DepartmentData {
    pub department: String,
    pub count: i64,
}

/// Average salary per department
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SalaryData {
    pub department: String,
    pub average_salary: f64,
}
