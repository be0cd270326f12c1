//! Session repository trait.

use async_trait::async_trait;

use super::model::SessionState;
use crate::error::Result;

/// Repository trait for session state persistence.
///
/// A single session blob is stored; `load` returns `None` when no state
/// has been saved (or it was cleared).
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Loads the saved session state, if any.
    async fn load(&self) -> Result<Option<SessionState>>;

    /// Saves the session state, replacing any previous blob.
    async fn save(&self, state: &SessionState) -> Result<()>;

    /// Discards the saved session state. Idempotent.
    async fn clear(&self) -> Result<()>;
}
