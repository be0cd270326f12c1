//! History timeline domain: items, kinds, and the undo/redo cursor.

pub mod model;
pub mod timeline;

pub use model::{GroundingReference, HistoryItem, ItemContent, ItemKind};
pub use timeline::Timeline;
