//! Which storage backends to build at startup.

use upload_shared::AppConfig;

use super::error::StorageError;

/// Settings for the S3 backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    /// AWS region.
    pub region: String,
    /// Bucket every key lives in.
    pub bucket: String,
    /// Custom endpoint for S3-compatible stores; enables path-style addressing.
    pub endpoint: Option<String>,
}

impl S3Settings {
    /// Create S3 settings for AWS proper.
    #[must_use]
    pub fn new(region: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            bucket: bucket.into(),
            endpoint: None,
        }
    }

    /// Point the client at an S3-compatible endpoint (MinIO, R2).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// Enabled backends. A `None` entry is not constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// S3 backend settings, present when `S3_ENABLED=true`.
    pub s3: Option<S3Settings>,
}

impl RegistryConfig {
    /// Derive the enabled backends from application configuration.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Configuration` when S3 is enabled without a
    /// region or bucket.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, StorageError> {
        if !config.s3_enabled {
            return Ok(Self::default());
        }

        let region = required(config.aws_region.as_deref(), "AWS_REGION")?;
        let bucket = required(config.s3_bucket.as_deref(), "S3_BUCKET")?;
        let mut s3 = S3Settings::new(region, bucket);
        if let Some(endpoint) = config.s3_endpoint.as_deref().filter(|e| !e.is_empty()) {
            s3 = s3.with_endpoint(endpoint);
        }

        Ok(Self { s3: Some(s3) })
    }
}

fn required<'a>(value: Option<&'a str>, var: &str) -> Result<&'a str, StorageError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StorageError::configuration(format!("{var} is required when S3_ENABLED=true")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_config(s3_enabled: bool, region: Option<&str>, bucket: Option<&str>) -> AppConfig {
        AppConfig {
            upload_provider: "s3".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            s3_enabled,
            aws_region: region.map(String::from),
            s3_bucket: bucket.map(String::from),
            s3_endpoint: None,
        }
    }

    #[test]
    fn test_s3_disabled_builds_nothing() {
        let config = RegistryConfig::from_app_config(&app_config(false, None, None))
            .expect("valid config");
        assert!(config.s3.is_none());
    }

    #[test]
    fn test_s3_enabled_carries_settings() {
        let config =
            RegistryConfig::from_app_config(&app_config(true, Some("eu-west-1"), Some("uploads")))
                .expect("valid config");
        assert_eq!(config.s3, Some(S3Settings::new("eu-west-1", "uploads")));
    }

    #[test]
    fn test_s3_enabled_requires_bucket() {
        let err = RegistryConfig::from_app_config(&app_config(true, Some("eu-west-1"), None))
            .unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
        assert!(err.to_string().contains("S3_BUCKET"));
    }

    #[test]
    fn test_s3_enabled_rejects_blank_bucket() {
        let err = RegistryConfig::from_app_config(&app_config(true, Some("eu-west-1"), Some("")))
            .unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));
    }

    #[test]
    fn test_s3_enabled_requires_region() {
        let err =
            RegistryConfig::from_app_config(&app_config(true, Some(" "), Some("uploads")))
                .unwrap_err();
        assert!(err.to_string().contains("AWS_REGION"));
    }

    #[test]
    fn test_endpoint_is_passed_through() {
        let mut app = app_config(true, Some("auto"), Some("uploads"));
        app.s3_endpoint = Some("http://localhost:9000".to_string());
        let config = RegistryConfig::from_app_config(&app).expect("valid config");
        assert_eq!(
            config.s3.and_then(|s| s.endpoint).as_deref(),
            Some("http://localhost:9000")
        );
    }
}
