//! Schema bootstrap for the directory tables
//!
//! All tables key records by an application-level unique id, distinct from
//! the storage rowid. Creation is idempotent and runs at every startup.

use anyhow::Result;
use sqlx::SqlitePool;

/// Create the directory tables if they do not exist yet
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            failed_attempts INTEGER NOT NULL DEFAULT 0,
            last_login TEXT
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS employees (
            id TEXT PRIMARY KEY,
            emp_code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            department TEXT NOT NULL,
            role TEXT NOT NULL,
            salary REAL NOT NULL,
            join_date TEXT NOT NULL,
            phone TEXT NOT NULL,
            address TEXT NOT NULL,
            photo TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS audit_logs (
            id TEXT PRIMARY KEY,
            action TEXT NOT NULL,
            employee_id TEXT,
            employee_name TEXT,
            user TEXT NOT NULL,
            timestamp TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = common::database::init_memory_pool()
        .await
        .expect("Failed to create in-memory pool");
    init_schema(&pool).await.expect("Failed to create schema");
    pool
}
