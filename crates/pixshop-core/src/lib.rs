//! Pixshop core domain: history timeline, generation requests, and the
//! trait seams (backend, repositories, secrets) the outer layers implement.

pub mod config;
pub mod error;
pub mod generation;
pub mod history;
pub mod preset;
pub mod secret;
pub mod session;

// Re-export common error type
pub use error::{PixshopError, Result};
