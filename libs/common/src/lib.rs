//! Common library for the employee directory backend
//!
//! This crate provides shared functionality used across the services
//! in the application, including database connectivity and error
//! handling.

pub mod database;
pub mod error;
