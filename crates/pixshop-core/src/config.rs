//! Configuration models shared across crates.

use serde::{Deserialize, Serialize};

/// Secret configuration loaded from `secret.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    /// Gemini API credentials, when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiSecret>,
}

impl SecretConfig {
    /// Returns the configured Gemini API key, ignoring empty strings.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini
            .as_ref()
            .map(|g| g.api_key.as_str())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Gemini credentials and optional model override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSecret {
    pub api_key: String,
    /// Model override; the client default is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}
