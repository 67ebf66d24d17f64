//! Audit log model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Immutable record of a mutating action or login-security event
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuditLogEntry {
    pub id: String,
    pub action: String,
    pub employee_id: Option<String>,
    pub employee_name: Option<String>,
    /// Actor username
    pub user: String,
    pub timestamp: DateTime<Utc>,
}
