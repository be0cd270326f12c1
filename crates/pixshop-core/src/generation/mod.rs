//! Generation domain: requests, progress phases, and the backend seam.

pub mod backend;
pub mod phase;
pub mod request;

pub use backend::{GeneratedImage, GenerationBackend, GenerationOptions, SourceImage};
pub use phase::GenerationPhase;
pub use request::{GenerationRequest, PanelKind};
