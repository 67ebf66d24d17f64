//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{NewEmployeeRequest, RegisterRequest, UpdateEmployeeRequest};

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate registration input; the role string is parsed separately
pub fn validate_registration(request: &RegisterRequest) -> Result<(), String> {
    if request.username.is_empty() {
        return Err("Username is required".to_string());
    }

    if request.password.is_empty() {
        return Err("Password is required".to_string());
    }

    Ok(())
}

/// Validate a new employee payload
pub fn validate_new_employee(request: &NewEmployeeRequest) -> Result<(), String> {
    if request.name.is_empty() {
        return Err("Name is required".to_string());
    }

    validate_email(&request.email)?;

    if request.salary < 0.0 {
        return Err("Salary must not be negative".to_string());
    }

    Ok(())
}

/// Validate a partial employee update
pub fn validate_employee_update(request: &UpdateEmployeeRequest) -> Result<(), String> {
    if let Some(email) = &request.email {
        validate_email(email)?;
    }

    if let Some(salary) = request.salary {
        if salary < 0.0 {
            return Err("Salary must not be negative".to_string());
        }
    }

    Ok(())
}
