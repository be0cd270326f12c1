//! Prompt preset domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generation::PanelKind;

/// A saved prompt for a specific panel.
///
/// Presets let users re-run a favourite directive without retyping it.
/// They are keyed by panel; the filters panel only lists filter presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPreset {
    /// Unique identifier (UUID format)
    pub id: String,
    /// Panel this preset belongs to.
    pub panel: PanelKind,
    /// Display name (e.g., "Golden hour", "Comic ink").
    pub name: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Timestamp when the preset was created.
    pub created_at: DateTime<Utc>,
}

impl PromptPreset {
    /// Creates a new preset for a panel.
    pub fn new(panel: PanelKind, name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            panel,
            name: name.into(),
            prompt: prompt.into(),
            negative_prompt: None,
            created_at: Utc::now(),
        }
    }

    /// Adds a negative prompt.
    pub fn with_negative_prompt(mut self, negative: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative.into());
        self
    }
}
