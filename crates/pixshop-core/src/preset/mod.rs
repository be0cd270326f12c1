//! Prompt presets: saved per-panel prompt configurations.

pub mod model;
pub mod repository;

pub use model::PromptPreset;
pub use repository::PresetRepository;
