//! Repositories for database operations

pub mod audit;
pub mod employee;
pub mod user;

pub use audit::AuditLogRepository;
pub use employee::EmployeeRepository;
pub use user::UserRepository;
