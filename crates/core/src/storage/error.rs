//! Storage error types.

use std::fmt::Display;

use thiserror::Error;
use upload_shared::AppError;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend call failed; the message carries the backend's text.
    #[error("{0}")]
    Provider(String),

    /// Caller-supplied argument rejected before contacting the backend.
    #[error("{0}")]
    InvalidArgument(String),

    /// No provider registered under the requested slug.
    #[error("storage provider '{slug}' not registered")]
    ProviderNotFound {
        /// The unknown slug.
        slug: String,
    },

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Wrap a backend failure with the operation that produced it.
    #[must_use]
    pub fn provider(operation: &str, err: impl Display) -> Self {
        Self::Provider(format!("{operation}: {err}"))
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a provider not found error.
    #[must_use]
    pub fn provider_not_found(slug: impl Into<String>) -> Self {
        Self::ProviderNotFound { slug: slug.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ProviderNotFound { .. } | StorageError::Configuration(_) => {
                Self::Configuration(err.to_string())
            }
            StorageError::Provider(_) | StorageError::InvalidArgument(_) => {
                Self::Storage(err.to_string())
            }
        }
    }
}
