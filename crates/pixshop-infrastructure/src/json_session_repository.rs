//! JSON file-backed SessionRepository implementation.
//!
//! The whole session (timeline items, cursor, active panel) is stored as a
//! single `session.json` blob with atomic writes. File I/O runs on the
//! blocking pool so repository calls never block the async runtime.

use std::path::Path;

use async_trait::async_trait;

use pixshop_core::session::{SessionRepository, SessionState};
use pixshop_core::{PixshopError, Result};

use crate::dto::SessionEnvelope;
use crate::paths::PixshopPaths;
use crate::storage::AtomicJsonFile;

/// File-backed session repository storing one JSON blob.
pub struct JsonSessionRepository {
    paths: PixshopPaths,
}

impl JsonSessionRepository {
    /// Creates a repository at the default location.
    pub fn default_location() -> Self {
        Self::new(None)
    }

    /// Creates a repository with a custom base directory (for testing).
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            paths: PixshopPaths::new(base_dir),
        }
    }

    fn file(&self) -> Result<AtomicJsonFile<SessionEnvelope>> {
        Ok(AtomicJsonFile::new(self.paths.session_file()?))
    }
}

#[async_trait]
impl SessionRepository for JsonSessionRepository {
    async fn load(&self) -> Result<Option<SessionState>> {
        let file = self.file()?;
        let envelope = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| PixshopError::internal(format!("session load task failed: {e}")))??;

        match envelope {
            Some(envelope) => Ok(Some(envelope.unwrap_state()?)),
            None => Ok(None),
        }
    }

    async fn save(&self, state: &SessionState) -> Result<()> {
        let file = self.file()?;
        let envelope = SessionEnvelope::wrap(state.clone());
        tokio::task::spawn_blocking(move || file.save(&envelope))
            .await
            .map_err(|e| PixshopError::internal(format!("session save task failed: {e}")))??;
        tracing::debug!(path = %self.paths.session_file()?.display(), "Session state saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let file = self.file()?;
        tokio::task::spawn_blocking(move || file.remove())
            .await
            .map_err(|e| PixshopError::internal(format!("session clear task failed: {e}")))??;
        tracing::debug!("Session state cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixshop_core::generation::PanelKind;
    use pixshop_core::history::{HistoryItem, Timeline};
    use tempfile::TempDir;

    fn sample_state() -> SessionState {
        let mut timeline = Timeline::new();
        timeline.append(HistoryItem::upload(vec![1, 2, 3], "image/png"));
        timeline.append(HistoryItem::generation(
            vec![4, 5],
            "image/png",
            Some("warmer".to_string()),
            vec![],
        ));
        SessionState::snapshot(&timeline, Some(PanelKind::Light))
    }

    #[tokio::test]
    async fn test_load_before_save_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(Some(temp_dir.path()));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(Some(temp_dir.path()));

        let state = sample_state();
        repo.save(&state).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 2);
        assert_eq!(loaded.cursor, Some(1));
        assert_eq!(loaded.active_panel, Some(PanelKind::Light));

        let timeline = loaded.into_timeline();
        assert_eq!(
            timeline.items()[0].content.bytes().unwrap().0,
            &[1u8, 2, 3]
        );
    }

    #[tokio::test]
    async fn test_clear_discards_state() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(Some(temp_dir.path()));

        repo.save(&sample_state()).await.unwrap();
        repo.clear().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());

        // Clearing with nothing saved is fine.
        repo.clear().await.unwrap();
    }
}
