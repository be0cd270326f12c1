//! Prompt preset repository trait.

use async_trait::async_trait;

use super::model::PromptPreset;
use crate::error::Result;
use crate::generation::PanelKind;

/// Repository trait for prompt preset persistence.
#[async_trait]
pub trait PresetRepository: Send + Sync {
    /// Lists presets for a panel, oldest first.
    async fn list(&self, panel: PanelKind) -> Result<Vec<PromptPreset>>;

    /// Saves a preset.
    async fn add(&self, preset: &PromptPreset) -> Result<()>;

    /// Deletes a preset by id. Fails with `NotFound` if it does not exist.
    async fn delete(&self, preset_id: &str) -> Result<()>;
}
