//! Pixshop application layer: the editor use case (request controller,
//! timeline facade, session and preset coordination) and default wiring.

pub mod editor_usecase;

pub use editor_usecase::{DispatchOutcome, EditorUseCase};

use std::path::Path;
use std::sync::Arc;

use pixshop_core::secret::SecretService;
use pixshop_core::Result;
use pixshop_infrastructure::{
    JsonSessionRepository, PixshopPaths, SecretServiceImpl, TomlPresetRepository,
};
use pixshop_interaction::GeminiImageClient;

/// Wires an [`EditorUseCase`] over the default file-backed stack.
///
/// `base_dir` overrides the platform config directory (used in tests).
/// Succeeds even when no API key is configured yet; generation requests
/// fail with `AuthenticationRequired` until one is added to secret.json.
pub async fn build_default_editor(base_dir: Option<&Path>) -> Result<Arc<EditorUseCase>> {
    let paths = PixshopPaths::new(base_dir);
    paths.ensure_secret_file()?;

    let secret_service = Arc::new(SecretServiceImpl::new(base_dir));
    let secrets = secret_service.load_secrets().await?;

    let backend = Arc::new(GeminiImageClient::from_config(&secrets));
    let session_repository = Arc::new(JsonSessionRepository::new(base_dir));
    let preset_repository = Arc::new(TomlPresetRepository::new(base_dir)?);

    Ok(Arc::new(EditorUseCase::new(
        backend,
        secret_service,
        session_repository,
        preset_repository,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_build_default_editor_without_credentials() {
        let temp_dir = TempDir::new().unwrap();
        let editor = build_default_editor(Some(temp_dir.path())).await.unwrap();

        assert!(!editor.is_busy());
        assert_eq!(editor.timeline_len().await, 0);
        // The template secret file was created.
        assert!(temp_dir.path().join("secret.json").exists());
    }

    #[tokio::test]
    async fn test_default_stack_persists_sessions() {
        let temp_dir = TempDir::new().unwrap();

        {
            let editor = build_default_editor(Some(temp_dir.path())).await.unwrap();
            editor.upload(vec![1, 2, 3], "image/png").await;
            editor.save_session().await.unwrap();
        }

        let editor = build_default_editor(Some(temp_dir.path())).await.unwrap();
        assert!(editor.load_session().await.unwrap());
        assert_eq!(editor.timeline_len().await, 1);
    }
}
