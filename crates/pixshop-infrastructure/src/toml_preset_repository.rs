//! Directory-backed PresetRepository implementation.
//!
//! One preset = one TOML file (scalable, diff-friendly):
//!
//! ```text
//! base_dir/
//! └── presets/
//!     ├── <preset-id-1>.toml
//!     ├── <preset-id-2>.toml
//!     └── <preset-id-3>.toml
//! ```
//!
//! Presets carry their panel inside the file; `list` filters by panel and
//! returns them oldest first.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use pixshop_core::generation::PanelKind;
use pixshop_core::preset::{PresetRepository, PromptPreset};
use pixshop_core::{PixshopError, Result};

use crate::paths::PixshopPaths;

/// Directory-of-TOML-files prompt preset repository.
pub struct TomlPresetRepository {
    presets_dir: PathBuf,
}

impl TomlPresetRepository {
    /// Creates a repository at the default location.
    pub fn default_location() -> Result<Self> {
        Self::new(None)
    }

    /// Creates a repository with a custom base directory (for testing).
    pub fn new(base_dir: Option<&Path>) -> Result<Self> {
        let presets_dir = PixshopPaths::new(base_dir).presets_dir()?;
        Ok(Self { presets_dir })
    }

    fn preset_path(&self, preset_id: &str) -> PathBuf {
        self.presets_dir.join(format!("{preset_id}.toml"))
    }

    async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.presets_dir).await?;
        Ok(())
    }
}

#[async_trait]
impl PresetRepository for TomlPresetRepository {
    async fn list(&self, panel: PanelKind) -> Result<Vec<PromptPreset>> {
        if !self.presets_dir.exists() {
            return Ok(Vec::new());
        }

        let mut presets = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.presets_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
                continue;
            }
            let content = tokio::fs::read_to_string(&path).await?;
            match toml::from_str::<PromptPreset>(&content) {
                Ok(preset) if preset.panel == panel => presets.push(preset),
                Ok(_) => {}
                Err(err) => {
                    // A corrupt preset file must not take down the whole list.
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "Skipping unreadable preset file"
                    );
                }
            }
        }

        presets.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(presets)
    }

    async fn add(&self, preset: &PromptPreset) -> Result<()> {
        self.ensure_dir().await?;

        let content = toml::to_string_pretty(preset)?;
        let path = self.preset_path(&preset.id);

        // tmp + rename keeps a crashed write from leaving a torn file
        let tmp_path = self.presets_dir.join(format!(".{}.toml.tmp", preset.id));
        tokio::fs::write(&tmp_path, content.as_bytes()).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::debug!(id = %preset.id, panel = %preset.panel, "Preset saved");
        Ok(())
    }

    async fn delete(&self, preset_id: &str) -> Result<()> {
        let path = self.preset_path(preset_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(id = %preset_id, "Preset deleted");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(PixshopError::not_found("preset", preset_id))
            }
            Err(err) => Err(err.into()),
        }
    }
}
