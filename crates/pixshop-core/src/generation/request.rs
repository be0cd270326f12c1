//! Generation request value objects.

use serde::{Deserialize, Serialize};

/// The transformation panel a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    /// Free-form generation / style transfer.
    Flux,
    /// Photographic filters. Requires a source image.
    Filters,
    /// Relighting. Requires a source image.
    Light,
    /// Text and typography compositing.
    Typography,
    /// Vector-art rendition.
    Vector,
    /// Style analysis; routes to another panel instead of generating.
    StyleExtractor,
}

impl PanelKind {
    /// Stable identifier used for storage paths and logging.
    pub fn slug(&self) -> &'static str {
        match self {
            PanelKind::Flux => "flux",
            PanelKind::Filters => "filters",
            PanelKind::Light => "light",
            PanelKind::Typography => "typography",
            PanelKind::Vector => "vector",
            PanelKind::StyleExtractor => "style_extractor",
        }
    }

    /// Panels that cannot run without a source image.
    pub fn requires_source(&self) -> bool {
        matches!(self, PanelKind::Filters | PanelKind::Light)
    }
}

impl std::fmt::Display for PanelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// A single user-triggered generation request.
///
/// Value object: created per user action, consumed immediately by the
/// request controller, not retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub panel: PanelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction_override: Option<String>,
    /// When true, the source is the first upload ever recorded instead of
    /// the current cursor item.
    #[serde(default)]
    pub use_original_source: bool,
    /// When true, bypass image conditioning even if a source exists.
    #[serde(default)]
    pub force_new: bool,
}

impl GenerationRequest {
    /// Creates a request for a panel with the given prompt.
    pub fn new(panel: PanelKind, prompt: impl Into<String>) -> Self {
        Self {
            panel,
            prompt: Some(prompt.into()),
            negative_prompt: None,
            system_instruction_override: None,
            use_original_source: false,
            force_new: false,
        }
    }

    /// Adds a negative prompt.
    pub fn with_negative_prompt(mut self, negative: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative.into());
        self
    }

    /// Overrides the panel's default system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction_override = Some(instruction.into());
        self
    }

    /// Sources from the original upload instead of the cursor item.
    pub fn from_original_source(mut self) -> Self {
        self.use_original_source = true;
        self
    }

    /// Forces text-to-image generation even when a source exists.
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }
}
