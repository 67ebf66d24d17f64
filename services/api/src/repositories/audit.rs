//! Append-only audit log repository

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::error;
use uuid::Uuid;

use crate::models::AuditLogEntry;

/// Audit log repository
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: SqlitePool,
}

impl AuditLogRepository {
    /// Create a new audit log repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one entry, timestamped at call time
    pub async fn append(
        &self,
        action: &str,
        user: &str,
        employee_id: Option<&str>,
        employee_name: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO audit_logs (id, action, employee_id, employee_name, user, timestamp)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(action)
        .bind(employee_id)
        .bind(employee_name)
        .bind(user)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Best-effort append: a persistence failure is logged and never
    /// propagated to the mutating operation that triggered it
    pub async fn record(
        &self,
        action: &str,
        user: &str,
        employee_id: Option<&str>,
        employee_name: Option<&str>,
    ) {
        if let Err(e) = self.append(action, user, employee_id, employee_name).await {
            error!("Failed to write audit log entry '{}': {}", action, e);
        }
    }

    /// Most recent entries, newest first
    pub async fn recent(&self, limit: i64) -> Result<Vec<AuditLogEntry>> {
        let entries = sqlx::query_as::<_, AuditLogEntry>(
            "SELECT id, action, employee_id, employee_name, user, timestamp
             FROM audit_logs ORDER BY timestamp DESC, rowid DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
