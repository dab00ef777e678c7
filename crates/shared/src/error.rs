//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed request body.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid configuration, fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Storage backend or multipart argument failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Configuration(_) | Self::Storage(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// The underlying message, without the variant prefix.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::Configuration(msg) | Self::Storage(msg) => msg,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
