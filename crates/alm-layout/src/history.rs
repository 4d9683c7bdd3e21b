//! Undo/redo history of committed edit actions.

use crate::action::EditAction;
use crate::overlap::OverlapManager;
use crate::snapshot::LayoutSnapshot;

/// One committed action with the state it replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub operation_id: u64,
    pub action: EditAction,
    /// Layout before the action ran.
    pub before: LayoutSnapshot,
    /// Overlap constraints owned by `before`.
    pub overlap: OverlapManager,
}

/// Linear history with a cursor.
///
/// Entries before the cursor can be undone, entries at and after it redone.
/// Pushing drops the redo tail; the oldest entry is evicted once the
/// capacity is exceeded.
#[derive(Debug, Clone, PartialEq)]
pub struct EditHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    capacity: usize,
}

impl EditHistory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            capacity,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor);
        self.entries.push(entry);
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len();
    }

    /// Entry the next undo reverts.
    #[must_use]
    pub fn undo_entry(&self) -> Option<&HistoryEntry> {
        self.cursor
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
    }

    /// Entry the next redo re-applies.
    #[must_use]
    pub fn redo_entry(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    /// Move the cursor past an undone entry.
    pub fn step_back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor past a redone entry.
    pub fn step_forward(&mut self) {
        self.cursor = (self.cursor + 1).min(self.entries.len());
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}
