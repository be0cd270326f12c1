//! Unified path management for pixshop configuration files.
//!
//! All pixshop configuration, secrets, session state, and presets live
//! under one config directory. A base-directory override supports tests.

use std::path::{Path, PathBuf};

use pixshop_core::PixshopError;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for PixshopError {
    fn from(err: PathError) -> Self {
        PixshopError::config(err.to_string())
    }
}

/// Unified path management for pixshop.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/pixshop/           # Config directory
/// ├── secret.json              # API keys
/// ├── session.json             # Saved editing session
/// └── presets/                 # Prompt presets (one TOML file each)
///     ├── <preset-id-1>.toml
///     └── <preset-id-2>.toml
/// ```
#[derive(Debug, Clone)]
pub struct PixshopPaths {
    base: Option<PathBuf>,
}

impl PixshopPaths {
    /// Creates a path resolver. `base` overrides the platform config
    /// directory (used in tests).
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the pixshop configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join("pixshop"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the saved session blob.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.json"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// Returns the directory holding prompt presets.
    pub fn presets_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("presets"))
    }

    /// Ensures the secret file exists, creating it with an empty template
    /// if it doesn't. Sets permissions to 600 on Unix.
    pub fn ensure_secret_file(&self) -> Result<PathBuf, PixshopError> {
        let path = self.secret_file()?;
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, b"{}\n")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}

impl Default for PixshopPaths {
    fn default() -> Self {
        Self::new(None)
    }
}
