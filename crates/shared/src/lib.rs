//! Shared configuration and errors for the upload service.
//!
//! This crate provides the pieces every other crate agrees on:
//! - Application-wide error types
//! - Environment-driven configuration

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
