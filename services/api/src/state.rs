//! Application state shared across handlers

use sqlx::SqlitePool;

use crate::jwt::JwtService;
use crate::notify::Notifier;
use crate::repositories::{AuditLogRepository, EmployeeRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub employee_repository: EmployeeRepository,
    pub audit_log: AuditLogRepository,
    pub notifier: Notifier,
}

impl AppState {
    /// Assemble the state from a pool and a JWT service
    pub fn new(pool: SqlitePool, jwt_service: JwtService) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone()),
            employee_repository: EmployeeRepository::new(pool.clone()),
            audit_log: AuditLogRepository::new(pool.clone()),
            notifier: Notifier::new(),
            jwt_service,
            db_pool: pool,
        }
    }
}
