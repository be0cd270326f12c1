//! Secret service implementation.
//!
//! Reads secret configuration (API keys) from `secret.json` and caches it
//! to avoid repeated file I/O.

use std::path::Path;
use std::sync::{Arc, RwLock};

use pixshop_core::config::SecretConfig;
use pixshop_core::secret::SecretService;
use pixshop_core::{PixshopError, Result};

use crate::paths::PixshopPaths;

/// File-backed secret service with an in-memory cache.
///
/// # Example
///
/// ```ignore
/// use pixshop_infrastructure::SecretServiceImpl;
/// use pixshop_core::secret::SecretService;
///
/// let service = SecretServiceImpl::default_location();
/// let secrets = service.load_secrets().await?;
/// ```
#[derive(Clone)]
pub struct SecretServiceImpl {
    paths: PixshopPaths,
    /// Cached secret config; RwLock for thread-safe lazy loading.
    cache: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Creates a secret service reading from the default location.
    pub fn default_location() -> Self {
        Self::new(None)
    }

    /// Creates a secret service with a custom base directory (for testing).
    pub fn new(base_path: Option<&Path>) -> Self {
        Self {
            paths: PixshopPaths::new(base_path),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Drops the cached config so the next load re-reads the file.
    pub fn invalidate_cache(&self) {
        let mut cache = self.cache.write().expect("secret cache lock poisoned");
        *cache = None;
    }

    fn load_internal(&self) -> Result<SecretConfig> {
        {
            let cache = self.cache.read().expect("secret cache lock poisoned");
            if let Some(ref cached) = *cache {
                return Ok(cached.clone());
            }
        }

        let path = self.paths.secret_file()?;
        if !path.exists() {
            // Missing file means no credentials configured, not a failure.
            return Ok(SecretConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let loaded: SecretConfig = serde_json::from_str(&content).map_err(|e| {
            // Do not echo file content into the error; it may hold keys.
            PixshopError::Serialization {
                format: "JSON".to_string(),
                message: format!("secret.json is not valid: {}", e),
            }
        })?;

        {
            let mut cache = self.cache.write().expect("secret cache lock poisoned");
            *cache = Some(loaded.clone());
        }

        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        self.load_internal()
    }

    async fn secret_file_exists(&self) -> bool {
        self.paths
            .secret_file()
            .map(|path| path.exists())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_empty_config() {
        let temp_dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::new(Some(temp_dir.path()));

        let config = service.load_secrets().await.unwrap();
        assert!(config.gemini_api_key().is_none());
        assert!(!service.secret_file_exists().await);
    }

    #[tokio::test]
    async fn test_loads_api_key() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("secret.json"),
            r#"{ "gemini": { "api_key": "k-test" } }"#,
        )
        .unwrap();

        let service = SecretServiceImpl::new(Some(temp_dir.path()));
        let config = service.load_secrets().await.unwrap();
        assert_eq!(config.gemini_api_key(), Some("k-test"));
        assert!(service.secret_file_exists().await);
    }

    #[tokio::test]
    async fn test_cache_and_invalidate() {
        let temp_dir = TempDir::new().unwrap();
        let secret_path = temp_dir.path().join("secret.json");
        std::fs::write(&secret_path, r#"{ "gemini": { "api_key": "old" } }"#).unwrap();

        let service = SecretServiceImpl::new(Some(temp_dir.path()));
        assert_eq!(
            service.load_secrets().await.unwrap().gemini_api_key(),
            Some("old")
        );

        // File change is invisible until the cache is invalidated.
        std::fs::write(&secret_path, r#"{ "gemini": { "api_key": "new" } }"#).unwrap();
        assert_eq!(
            service.load_secrets().await.unwrap().gemini_api_key(),
            Some("old")
        );

        service.invalidate_cache();
        assert_eq!(
            service.load_secrets().await.unwrap().gemini_api_key(),
            Some("new")
        );
    }

    #[tokio::test]
    async fn test_invalid_json_does_not_leak_content() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("secret.json"), "{ api_key: sk-oops").unwrap();

        let service = SecretServiceImpl::new(Some(temp_dir.path()));
        let err = service.load_secrets().await.unwrap_err();
        assert!(!err.to_string().contains("sk-oops"));
    }
}
