//! Session domain model.
//!
//! `SessionState` is the persisted snapshot of an editing session: the
//! timeline contents, the cursor, and the active panel. It is saved as a
//! single blob and restored on the next launch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generation::PanelKind;
use crate::history::{HistoryItem, Timeline};

/// Persisted editing-session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Timeline items in insertion order.
    pub items: Vec<HistoryItem>,
    /// Cursor into `items`, or `None` when nothing is selected.
    pub cursor: Option<usize>,
    /// Panel the user last had open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_panel: Option<PanelKind>,
    /// Timestamp when the state was last saved.
    pub saved_at: DateTime<Utc>,
}

impl SessionState {
    /// Snapshots a timeline for persistence.
    pub fn snapshot(timeline: &Timeline, active_panel: Option<PanelKind>) -> Self {
        Self {
            items: timeline.items().to_vec(),
            cursor: timeline.cursor(),
            active_panel,
            saved_at: Utc::now(),
        }
    }

    /// Rebuilds the timeline, clamping any stale cursor.
    pub fn into_timeline(self) -> Timeline {
        Timeline::from_parts(self.items, self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryItem;

    #[test]
    fn test_snapshot_and_restore() {
        let mut timeline = Timeline::new();
        timeline.append(HistoryItem::upload(vec![1], "image/png"));
        timeline.append(HistoryItem::upload(vec![2], "image/png"));
        timeline.move_to(0);

        let state = SessionState::snapshot(&timeline, Some(PanelKind::Filters));
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.cursor, Some(0));
        assert_eq!(state.active_panel, Some(PanelKind::Filters));

        let restored = state.into_timeline();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.cursor(), Some(0));
    }
}
