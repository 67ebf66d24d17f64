//! Employee directory models

pub mod audit;
pub mod dashboard;
pub mod employee;
pub mod user;

// Re-export for convenience
pub use audit::AuditLogEntry;
pub use dashboard::{DashboardStats, DepartmentData, SalaryData};
pub use employee::{
    Employee, EmployeeListQuery, EmployeeStatus, NewEmployeeRequest, UpdateEmployeeRequest,
};
pub use user::{LoginRequest, LoginResponse, NewUser, RegisterRequest, User, UserResponse, UserRole, UserStatus};
