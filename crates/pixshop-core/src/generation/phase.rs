//! Generation progress phases.
//!
//! Advisory, human-readable progress for the UI. Not part of the
//! correctness contract.

use serde::{Deserialize, Serialize};

/// Coarse progress phase of the request controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPhase {
    /// No request in flight.
    #[default]
    Idle,
    /// A request was accepted and is being prepared.
    Dispatching,
    /// The outbound call was sent; waiting on the service.
    AwaitingResult,
}

impl std::fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            GenerationPhase::Idle => "idle",
            GenerationPhase::Dispatching => "dispatch started",
            GenerationPhase::AwaitingResult => "awaiting result",
        };
        f.write_str(text)
    }
}
