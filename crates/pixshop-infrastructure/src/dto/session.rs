//! Session persistence DTO.
//!
//! A versioned envelope around the domain `SessionState`, so the on-disk
//! format can evolve without breaking older blobs silently.

use serde::{Deserialize, Serialize};

use pixshop_core::session::SessionState;
use pixshop_core::{PixshopError, Result};

/// Current on-disk session format version.
pub const SESSION_FORMAT_VERSION: u32 = 1;

/// On-disk representation of a saved session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnvelope {
    pub version: u32,
    pub state: SessionState,
}

impl SessionEnvelope {
    /// Wraps a session state in the current format version.
    pub fn wrap(state: SessionState) -> Self {
        Self {
            version: SESSION_FORMAT_VERSION,
            state,
        }
    }

    /// Unwraps the envelope, rejecting unknown format versions.
    pub fn unwrap_state(self) -> Result<SessionState> {
        if self.version != SESSION_FORMAT_VERSION {
            return Err(PixshopError::Serialization {
                format: "JSON".to_string(),
                message: format!(
                    "Unsupported session format version {} (expected {})",
                    self.version, SESSION_FORMAT_VERSION
                ),
            });
        }
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixshop_core::history::Timeline;
    use pixshop_core::session::SessionState;

    #[test]
    fn test_wrap_and_unwrap() {
        let state = SessionState::snapshot(&Timeline::new(), None);
        let envelope = SessionEnvelope::wrap(state);
        assert_eq!(envelope.version, SESSION_FORMAT_VERSION);
        assert!(envelope.unwrap_state().is_ok());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let state = SessionState::snapshot(&Timeline::new(), None);
        let envelope = SessionEnvelope {
            version: 99,
            state,
        };
        let err = envelope.unwrap_state().unwrap_err();
        assert!(err.to_string().contains("version 99"));
    }
}
