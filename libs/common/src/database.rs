//! Database module for handling SQLite connections and operations
//!
//! This module provides connection pooling, configuration, and health checks
//! for the embedded SQLite database backing the directory.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::env;

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `DATABASE_URL`: SQLite connection URL (default: `sqlite://employee_directory.db?mode=rwc`)
    /// - `DATABASE_MAX_CONNECTIONS`: Maximum number of connections (default: 5)
    pub fn from_env() -> DatabaseResult<Self> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://employee_directory.db?mode=rwc".to_string());

        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => parse_max_connections(&value)?,
            Err(_) => 5,
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

fn parse_max_connections(value: &str) -> DatabaseResult<u32> {
    value.parse().map_err(|_| {
        DatabaseError::Configuration(format!(
            "invalid DATABASE_MAX_CONNECTIONS value: {value}"
        ))
    })
}

/// Initialize a SQLite connection pool
pub async fn init_pool(config: &DatabaseConfig) -> DatabaseResult<Pool<Sqlite>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .map_err(DatabaseError::Connection)?;

    Ok(pool)
}

/// Initialize an in-memory SQLite pool, used by tests
///
/// A single connection is used so that every query sees the same
/// in-memory database.
pub async fn init_memory_pool() -> DatabaseResult<Pool<Sqlite>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .map_err(DatabaseError::Connection)?;

    Ok(pool)
}

/// Check database connectivity
pub async fn health_check(pool: &SqlitePool) -> DatabaseResult<bool> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(DatabaseError::Query)?;

    Ok(true)
}
