// Chunk: docs/chunks/undo_history - Grouped two-stack undo/redo of edit primitives

//! Undo history: a linear, grouped record of edit primitives.
//!
//! The manager keeps two stacks of [`UndoGroup`]s. Recording appends
//! primitives to an open group; closing a non-empty group pushes it onto
//! the undo stack and clears the redo stack (new edits branch the
//! history). Undo pops a group, applies the inverse of each entry to the
//! buffer in reverse order, and pushes the freshly constructed inverse
//! group onto the redo stack — so an undo is itself redoable, and a
//! balanced undo/redo sequence reproduces buffer bytes exactly.
//!
//! Entries are asymmetric on purpose: an insertion is fully described by
//! `(pos, len)` because the bytes live in the buffer until the moment the
//! inverse runs, while a deletion must own a copy of the removed bytes.
//! Callers therefore copy the doomed range, call
//! [`UndoManager::record_delete`], and only then perform the buffer
//! deletion — the entry's bytes are authoritative.
//!
//! Markers are derived state: undo restores buffer bytes, never marker
//! positions.

use std::collections::VecDeque;

use tracing::trace;

use crate::gap_buffer::GapBuffer;

/// Default cap on the number of groups kept on the undo stack.
pub const DEFAULT_MAX_UNDO_STEPS: usize = 1000;

/// One recorded edit primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoEntry {
    /// `len` bytes were inserted at `pos`. Inverse: delete that range.
    Insert { pos: usize, len: usize },
    /// `text` was removed starting at `pos`. Inverse: re-insert it.
    Delete { pos: usize, text: Vec<u8> },
}

/// An ordered list of entries forming one atomic user-visible edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoGroup {
    entries: Vec<UndoEntry>,
}

impl UndoGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the group.
    pub fn push(&mut self, entry: UndoEntry) {
        self.entries.push(entry);
    }

    /// Returns true if the group records nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries in the group.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The recorded entries, oldest first.
    pub fn entries(&self) -> &[UndoEntry] {
        &self.entries
    }
}

/// Two-stack grouped undo/redo history for one buffer.
#[derive(Debug)]
pub struct UndoManager {
    /// Oldest group at the front so the cap can evict in O(1).
    undo_stack: VecDeque<UndoGroup>,
    redo_stack: VecDeque<UndoGroup>,
    /// Group currently being built, if any.
    open: Option<UndoGroup>,
    max_undo_steps: usize,
}

impl UndoManager {
    /// Creates a manager with the default step cap.
    pub fn new() -> Self {
        Self::with_max_steps(DEFAULT_MAX_UNDO_STEPS)
    }

    /// Creates a manager keeping at most `max_undo_steps` groups.
    pub fn with_max_steps(max_undo_steps: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            open: None,
            max_undo_steps,
        }
    }

    // ==================== Recording ====================

    /// Opens a new group. No-op if one is already open.
    pub fn begin_group(&mut self) {
        if self.open.is_none() {
            self.open = Some(UndoGroup::new());
        }
    }

    /// Closes the open group.
    ///
    /// A non-empty group moves onto the undo stack and clears the redo
    /// stack. Closing with no open group, or an empty one, is a no-op —
    /// defensive begin/end pairs never cost redo history.
    pub fn end_group(&mut self) {
        let Some(group) = self.open.take() else {
            return;
        };
        if group.is_empty() {
            return;
        }
        trace!(entries = group.len(), "push undo group");
        self.push_undo_group(group);
        self.redo_stack.clear();
    }

    /// Records that `len` bytes were inserted at `pos`, opening a group
    /// if none is open.
    pub fn record_insert(&mut self, pos: usize, len: usize) {
        self.open_group().push(UndoEntry::Insert { pos, len });
    }

    /// Records that `text` was removed starting at `pos`, opening a group
    /// if none is open. Takes ownership of the copied bytes.
    pub fn record_delete(&mut self, pos: usize, text: Vec<u8>) {
        self.open_group().push(UndoEntry::Delete { pos, text });
    }

    fn open_group(&mut self) -> &mut UndoGroup {
        self.open.get_or_insert_with(UndoGroup::new)
    }

    /// Pushes onto the undo stack, evicting the oldest group past the cap.
    fn push_undo_group(&mut self, group: UndoGroup) {
        if self.undo_stack.len() >= self.max_undo_steps {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(group);
    }

    // ==================== History traversal ====================

    /// Undoes the most recent group against `buffer`.
    ///
    /// Applies each entry's inverse in reverse order, recording the new
    /// inverses into a group that lands on the redo stack. Returns false
    /// if there is nothing to undo.
    pub fn undo(&mut self, buffer: &mut GapBuffer) -> bool {
        let Some(group) = self.undo_stack.pop_back() else {
            return false;
        };
        let inverse = Self::apply_inverse(&group, buffer);
        trace!(entries = inverse.len(), "undo group");
        self.redo_stack.push_back(inverse);
        true
    }

    /// Redoes the most recently undone group against `buffer`.
    ///
    /// Symmetric to [`undo`](Self::undo): the constructed inverse group
    /// returns to the undo stack. Returns false if there is nothing to
    /// redo.
    pub fn redo(&mut self, buffer: &mut GapBuffer) -> bool {
        let Some(group) = self.redo_stack.pop_back() else {
            return false;
        };
        let inverse = Self::apply_inverse(&group, buffer);
        trace!(entries = inverse.len(), "redo group");
        self.push_undo_group(inverse);
        true
    }

    /// Applies the inverse of every entry in `group`, newest first, and
    /// returns the group that reverses the reversal.
    fn apply_inverse(group: &UndoGroup, buffer: &mut GapBuffer) -> UndoGroup {
        let mut inverse = UndoGroup::new();
        for entry in group.entries.iter().rev() {
            match entry {
                UndoEntry::Insert { pos, len } => {
                    // Capture the bytes before they disappear.
                    let text = buffer.slice(*pos, *len);
                    buffer.delete(*pos, *len);
                    inverse.push(UndoEntry::Delete { pos: *pos, text });
                }
                UndoEntry::Delete { pos, text } => {
                    buffer.insert(*pos, text);
                    inverse.push(UndoEntry::Insert {
                        pos: *pos,
                        len: text.len(),
                    });
                }
            }
        }
        inverse
    }

    // ==================== Queries ====================

    /// Number of groups available to undo.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of groups available to redo.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// True while a group is being built.
    pub fn is_group_open(&self) -> bool {
        self.open.is_some()
    }

    /// The configured group cap.
    pub fn max_undo_steps(&self) -> usize {
        self.max_undo_steps
    }

    /// Drops all history, including any open group.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open = None;
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}
