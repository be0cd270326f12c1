//! Pixshop infrastructure: file-backed persistence for sessions, presets,
//! and secrets, plus unified path management.

pub mod dto;
pub mod json_session_repository;
pub mod paths;
pub mod secret_service;
pub mod storage;
pub mod toml_preset_repository;

pub use crate::json_session_repository::JsonSessionRepository;
pub use crate::paths::PixshopPaths;
pub use crate::secret_service::SecretServiceImpl;
pub use crate::toml_preset_repository::TomlPresetRepository;
