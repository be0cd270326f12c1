//! Editing-session persistence domain.

pub mod model;
pub mod repository;

pub use model::SessionState;
pub use repository::SessionRepository;
