//! Application configuration management.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration.
///
/// Read from flat environment variables (`UPLOAD_PROVIDER`, `S3_BUCKET`, ...).
/// Field names are the lowercase variable names.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Slug of the active storage provider.
    #[serde(default)]
    pub upload_provider: String,
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whether the S3 backend is built at startup.
    #[serde(default)]
    pub s3_enabled: bool,
    /// AWS region for the S3 backend.
    #[serde(default)]
    pub aws_region: Option<String>,
    /// Bucket used by the S3 backend.
    #[serde(default)]
    pub s3_bucket: Option<String>,
    /// Custom endpoint for S3-compatible stores (MinIO, R2).
    #[serde(default)]
    pub s3_endpoint: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if a variable cannot be parsed or
    /// `UPLOAD_PROVIDER` is missing.
    pub fn load() -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Checks the invariants `load` cannot express through serde.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` when the provider slug is blank.
    pub fn validate(&self) -> AppResult<()> {
        if self.upload_provider.trim().is_empty() {
            return Err(AppError::Configuration(
                "UPLOAD_PROVIDER env var is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Socket address string the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
