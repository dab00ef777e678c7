//! Provider registry: slug → live backend.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::info;

use super::config::RegistryConfig;
use super::error::StorageError;
use super::provider::StorageProvider;
use super::s3::S3Provider;

/// Short identifier selecting a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderSlug(String);

impl ProviderSlug {
    /// Slug of the S3 backend.
    pub const S3: &'static str = "s3";

    /// Create a slug, normalized to trimmed lowercase.
    #[must_use]
    pub fn new(slug: impl AsRef<str>) -> Self {
        Self(slug.as_ref().trim().to_ascii_lowercase())
    }

    /// The S3 backend's slug.
    #[must_use]
    pub fn s3() -> Self {
        Self(Self::S3.to_string())
    }

    /// Borrow the slug as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderSlug {
    fn from(slug: &str) -> Self {
        Self::new(slug)
    }
}

/// Registered storage backends, built once at startup.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderSlug, Arc<dyn StorageProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every backend enabled in `config`.
    ///
    /// Construction is eager and never retried. Settings are already
    /// checked by `RegistryConfig::from_app_config`.
    pub async fn load(config: &RegistryConfig) -> Self {
        let mut registry = Self::new();

        if let Some(settings) = &config.s3 {
            let provider = S3Provider::from_settings(settings).await;
            registry.register(ProviderSlug::s3(), Arc::new(provider));
        }

        info!(providers = ?registry.slugs(), "Storage providers loaded");
        registry
    }

    /// Install `provider` under `slug`, replacing any previous entry.
    pub fn register(&mut self, slug: ProviderSlug, provider: Arc<dyn StorageProvider>) {
        self.providers.insert(slug, provider);
    }

    /// Look up the provider registered under `slug`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ProviderNotFound` if nothing is registered under `slug`.
    pub fn get(&self, slug: &ProviderSlug) -> Result<Arc<dyn StorageProvider>, StorageError> {
        self.providers
            .get(slug)
            .cloned()
            .ok_or_else(|| StorageError::provider_not_found(slug.as_str()))
    }

    /// Registered slugs, sorted.
    #[must_use]
    pub fn slugs(&self) -> Vec<&str> {
        let mut slugs: Vec<&str> = self.providers.keys().map(ProviderSlug::as_str).collect();
        slugs.sort_unstable();
        slugs
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::S3Settings;
    use crate::storage::testing::InMemoryProvider;

    fn registry_with_memory() -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        registry.register(ProviderSlug::new("memory"), Arc::new(InMemoryProvider::new()));
        registry
    }

    #[test]
    fn test_slug_is_normalized() {
        assert_eq!(ProviderSlug::new(" S3 "), ProviderSlug::s3());
        assert_eq!(ProviderSlug::from("s3").to_string(), "s3");
    }

    #[test]
    fn test_unregistered_slug_is_not_found() {
        let registry = registry_with_memory();
        let err = registry.get(&ProviderSlug::new("gcs")).err().expect("lookup fails");
        assert!(matches!(err, StorageError::ProviderNotFound { ref slug } if slug == "gcs"));
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let registry = registry_with_memory();
        let slug = ProviderSlug::new("memory");

        let first = registry.get(&slug).expect("registered");
        let second = registry.get(&slug).expect("registered");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "memory");
    }

    #[test]
    fn test_slugs_are_sorted() {
        let mut registry = registry_with_memory();
        registry.register(ProviderSlug::new("archive"), Arc::new(InMemoryProvider::new()));
        assert_eq!(registry.slugs(), vec!["archive", "memory"]);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_load_with_nothing_enabled_is_empty() {
        let registry = ProviderRegistry::load(&RegistryConfig::default()).await;
        assert!(registry.is_empty());
        assert!(registry.get(&ProviderSlug::s3()).is_err());
    }

    #[tokio::test]
    async fn test_load_builds_s3_when_enabled() {
        let config = RegistryConfig {
            s3: Some(S3Settings::new("us-east-1", "uploads").with_endpoint("http://127.0.0.1:9")),
        };
        let registry = ProviderRegistry::load(&config).await;

        let provider = registry.get(&ProviderSlug::s3()).expect("s3 registered");
        assert_eq!(provider.name(), "s3");
    }
}
