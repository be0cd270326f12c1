//! On-disk DTOs and format envelopes.

pub mod session;

pub use session::{SessionEnvelope, SESSION_FORMAT_VERSION};
