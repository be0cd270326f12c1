//! The undo/redo timeline.
//!
//! Standard linear-undo semantics: the timeline is an ordered sequence of
//! [`HistoryItem`]s with a cursor. Appending while the cursor sits before
//! the end discards the redo branch. Mutations are serialized by the single
//! writer that owns the timeline (the editor use case); no internal locking.

use serde::{Deserialize, Serialize};

use super::model::{HistoryItem, ItemKind};

/// Ordered history of visual artifacts with an undo/redo cursor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    items: Vec<HistoryItem>,
    /// Current position, or `None` when no item is selected.
    cursor: Option<usize>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a timeline from persisted parts.
    ///
    /// An out-of-range cursor is clamped to the last item so the invariant
    /// (`cursor` is `None` or a valid index) holds even for stale state.
    pub fn from_parts(items: Vec<HistoryItem>, cursor: Option<usize>) -> Self {
        let cursor = match cursor {
            Some(_) if items.is_empty() => None,
            Some(i) => Some(i.min(items.len() - 1)),
            None => None,
        };
        Self { items, cursor }
    }

    /// Appends an item, discarding any redo branch past the cursor.
    ///
    /// After the call the new item is the last one and the cursor points at
    /// it. With the cursor at `i`, the result is `items[0..=i] + [item]`.
    pub fn append(&mut self, item: HistoryItem) {
        match self.cursor {
            Some(i) => self.items.truncate(i + 1),
            None => self.items.clear(),
        }
        self.items.push(item);
        self.cursor = Some(self.items.len() - 1);
    }

    /// Moves the cursor to `index`, clamped to the valid range.
    ///
    /// No-op on an empty timeline.
    pub fn move_to(&mut self, index: usize) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = Some(index.min(self.items.len() - 1));
    }

    /// Moves the cursor one step back, clamped at the first item.
    pub fn undo(&mut self) {
        if let Some(i) = self.cursor {
            self.move_to(i.saturating_sub(1));
        }
    }

    /// Moves the cursor one step forward, clamped at the last item.
    pub fn redo(&mut self) {
        if let Some(i) = self.cursor {
            self.move_to(i + 1);
        }
    }

    /// Deselects the current item without discarding history.
    pub fn close(&mut self) {
        self.cursor = None;
    }

    /// Removes all items and resets the cursor.
    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = None;
    }

    /// The item under the cursor, if any.
    pub fn current(&self) -> Option<&HistoryItem> {
        self.cursor.and_then(|i| self.items.get(i))
    }

    /// The earliest item with kind [`ItemKind::Upload`], used to resolve
    /// "use original source" requests.
    pub fn first_upload(&self) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.kind == ItemKind::Upload)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(i) if i + 1 < self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::model::HistoryItem;

    fn upload(tag: u8) -> HistoryItem {
        HistoryItem::upload(vec![tag], "image/png")
    }

    fn generation(tag: u8) -> HistoryItem {
        HistoryItem::generation(vec![tag], "image/png", Some(format!("gen-{tag}")), vec![])
    }

    #[test]
    fn test_append_to_empty_selects_item() {
        let mut timeline = Timeline::new();
        let item = upload(1);
        let id = item.id.clone();
        timeline.append(item);

        assert_eq!(timeline.cursor(), Some(0));
        assert_eq!(timeline.current().unwrap().id, id);
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_append_truncates_redo_branch() {
        let mut timeline = Timeline::new();
        timeline.append(upload(0));
        timeline.append(generation(1));
        timeline.append(generation(2));
        assert_eq!(timeline.cursor(), Some(2));

        timeline.move_to(0);
        let new_item = generation(9);
        let id = new_item.id.clone();
        timeline.append(new_item);

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.items()[1].id, id);
        assert_eq!(timeline.cursor(), Some(1));
    }

    #[test]
    fn test_append_at_cursor_arithmetic() {
        // After append(x) at cursor i: len == i + 2, items[i + 1] == x.
        let mut timeline = Timeline::new();
        for tag in 0..5 {
            timeline.append(generation(tag));
        }
        for i in 0..5 {
            timeline.move_to(i);
            let x = generation(100 + i as u8);
            let id = x.id.clone();
            timeline.append(x);
            assert_eq!(timeline.len(), i + 2);
            assert_eq!(timeline.items()[i + 1].id, id);
            assert_eq!(timeline.cursor(), Some(i + 1));
        }
    }

    #[test]
    fn test_close_keeps_items() {
        let mut timeline = Timeline::new();
        timeline.append(upload(0));
        timeline.append(generation(1));

        timeline.close();

        assert_eq!(timeline.cursor(), None);
        assert!(timeline.current().is_none());
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn test_append_after_close_restarts_history() {
        let mut timeline = Timeline::new();
        timeline.append(upload(0));
        timeline.close();

        timeline.append(upload(1));

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.cursor(), Some(0));
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut timeline = Timeline::new();
        timeline.append(upload(0));
        timeline.append(generation(1));

        timeline.clear();

        assert!(timeline.is_empty());
        assert_eq!(timeline.cursor(), None);
    }

    #[test]
    fn test_move_to_clamps_at_boundaries() {
        let mut timeline = Timeline::new();
        timeline.append(upload(0));
        timeline.append(generation(1));

        timeline.move_to(99);
        assert_eq!(timeline.cursor(), Some(1));

        timeline.move_to(0);
        assert_eq!(timeline.cursor(), Some(0));
    }

    #[test]
    fn test_move_to_on_empty_is_noop() {
        let mut timeline = Timeline::new();
        timeline.move_to(3);
        assert_eq!(timeline.cursor(), None);
    }

    #[test]
    fn test_undo_redo_clamp() {
        let mut timeline = Timeline::new();
        timeline.append(upload(0));
        timeline.append(generation(1));

        assert!(timeline.can_undo());
        timeline.undo();
        assert_eq!(timeline.cursor(), Some(0));
        assert!(!timeline.can_undo());
        timeline.undo();
        assert_eq!(timeline.cursor(), Some(0));

        assert!(timeline.can_redo());
        timeline.redo();
        assert_eq!(timeline.cursor(), Some(1));
        assert!(!timeline.can_redo());
        timeline.redo();
        assert_eq!(timeline.cursor(), Some(1));
    }

    #[test]
    fn test_first_upload_is_earliest() {
        let mut timeline = Timeline::new();
        let first = upload(0);
        let first_id = first.id.clone();
        timeline.append(first);
        timeline.append(generation(1));
        timeline.append(upload(2));

        assert_eq!(timeline.first_upload().unwrap().id, first_id);
    }

    #[test]
    fn test_first_upload_survives_truncation_of_later_items() {
        let mut timeline = Timeline::new();
        let first = upload(0);
        let first_id = first.id.clone();
        timeline.append(first);
        timeline.append(generation(1));
        timeline.append(generation(2));

        timeline.move_to(0);
        timeline.append(generation(3));

        assert_eq!(timeline.first_upload().unwrap().id, first_id);
    }

    #[test]
    fn test_first_upload_none_without_uploads() {
        let mut timeline = Timeline::new();
        timeline.append(generation(1));
        assert!(timeline.first_upload().is_none());
    }

    #[test]
    fn test_from_parts_clamps_stale_cursor() {
        let items = vec![upload(0), generation(1)];
        let timeline = Timeline::from_parts(items, Some(7));
        assert_eq!(timeline.cursor(), Some(1));

        let empty = Timeline::from_parts(vec![], Some(3));
        assert_eq!(empty.cursor(), None);
    }
}
