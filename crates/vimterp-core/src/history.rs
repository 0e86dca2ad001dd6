//! Undo history: transaction-based edit tracking.
//!
//! Records every mutation of a [`Buffer`](crate::buffer::Buffer) as a
//! reversible [`Edit`] grouped into [`Transaction`]s. A transaction is the
//! atomic unit of undo:
//!
//! - **Normal mode**: each command (`x`, `dd`, `p`, ...) is one transaction.
//! - **Insert mode**: everything from entering insert to pressing Esc.
//!
//! # Usage
//!
//! ```text
//! history.begin(cursor);
//! // perform edits on the rope, recording each one:
//! history.record_insert(at, text);
//! history.record_delete(at, deleted_text);
//! // finalize:
//! history.commit();
//! ```
//!
//! Offsets are absolute char indices into the rope. Empty transactions are
//! discarded.

use ropey::Rope;

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// A single reversible rope edit.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    /// Text was inserted at `at`. Undo = remove it.
    Insert { at: usize, text: String },

    /// Text was removed starting at `at`. Undo = insert it back.
    Delete { at: usize, text: String },
}

impl Edit {
    fn revert(&self, rope: &mut Rope) {
        match self {
            Self::Insert { at, text } => {
                let end = (*at + text.chars().count()).min(rope.len_chars());
                rope.remove(*at..end);
            }
            Self::Delete { at, text } => rope.insert(*at, text),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A group of edits that undo as one unit, plus the cursor offset to
/// restore.
#[derive(Debug, Clone)]
struct Transaction {
    edits: Vec<Edit>,
    cursor_before: usize,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo history for a rope. There is no redo.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Transaction>,
    pending: Option<Transaction>,
}

impl History {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            pending: None,
        }
    }

    /// Start a new transaction. A transaction left open is committed first.
    pub fn begin(&mut self, cursor: usize) {
        if self.pending.is_some() {
            self.commit();
        }
        self.pending = Some(Transaction {
            edits: Vec::new(),
            cursor_before: cursor,
        });
    }

    /// Record that `text` was inserted at `at`. No-op without an open
    /// transaction.
    pub fn record_insert(&mut self, at: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(txn) = &mut self.pending {
            txn.edits.push(Edit::Insert {
                at,
                text: text.to_string(),
            });
        }
    }

    /// Record that `text` was removed starting at `at`. Capture the text
    /// before removing it.
    pub fn record_delete(&mut self, at: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(txn) = &mut self.pending {
            txn.edits.push(Edit::Delete {
                at,
                text: text.to_string(),
            });
        }
    }

    /// Finalize the open transaction. Empty transactions are dropped.
    pub fn commit(&mut self) {
        if let Some(txn) = self.pending.take() {
            if !txn.edits.is_empty() {
                self.undo_stack.push(txn);
            }
        }
    }

    /// Undo the last transaction. Returns the cursor offset to restore, or
    /// `None` when there is nothing to undo.
    pub fn undo(&mut self, rope: &mut Rope) -> Option<usize> {
        self.commit();
        let txn = self.undo_stack.pop()?;
        for edit in txn.edits.iter().rev() {
            edit.revert(rope);
        }
        Some(txn.cursor_before)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(rope: &mut Rope, history: &mut History, at: usize, text: &str) {
        rope.insert(at, text);
        history.record_insert(at, text);
    }

    fn delete(rope: &mut Rope, history: &mut History, at: usize, len: usize) {
        let text = rope.slice(at..at + len).to_string();
        rope.remove(at..at + len);
        history.record_delete(at, &text);
    }

    #[test]
    fn undo_insert_restores_text_and_cursor() {
        let mut rope = Rope::from_str("hello");
        let mut h = History::new();
        h.begin(5);
        insert(&mut rope, &mut h, 5, " world");
        h.commit();

        assert_eq!(h.undo(&mut rope), Some(5));
        assert_eq!(rope.to_string(), "hello");
    }

    #[test]
    fn undo_delete_restores_text() {
        let mut rope = Rope::from_str("line 1\nline 2\n");
        let mut h = History::new();
        h.begin(0);
        delete(&mut rope, &mut h, 0, 7);
        h.commit();
        assert_eq!(rope.to_string(), "line 2\n");

        h.undo(&mut rope);
        assert_eq!(rope.to_string(), "line 1\nline 2\n");
    }

    #[test]
    fn transaction_groups_multiple_edits() {
        let mut rope = Rope::from_str("abc");
        let mut h = History::new();
        h.begin(0);
        delete(&mut rope, &mut h, 0, 1);
        insert(&mut rope, &mut h, 0, "XY");
        insert(&mut rope, &mut h, 4, "!");
        h.commit();
        assert_eq!(rope.to_string(), "XYbc!");

        h.undo(&mut rope);
        assert_eq!(rope.to_string(), "abc");
        assert_eq!(h.undo(&mut rope), None);
    }

    #[test]
    fn undo_pops_transactions_newest_first() {
        let mut rope = Rope::from_str("a");
        let mut h = History::new();
        h.begin(1);
        insert(&mut rope, &mut h, 1, "b");
        h.commit();
        h.begin(2);
        insert(&mut rope, &mut h, 2, "c");
        h.commit();

        assert_eq!(h.undo(&mut rope), Some(2));
        assert_eq!(rope.to_string(), "ab");
        assert_eq!(h.undo(&mut rope), Some(1));
        assert_eq!(rope.to_string(), "a");
    }

    #[test]
    fn empty_transaction_is_discarded() {
        let mut rope = Rope::from_str("x");
        let mut h = History::new();
        h.begin(0);
        h.commit();
        assert_eq!(h.undo(&mut rope), None);
        assert_eq!(rope.to_string(), "x");
    }

    #[test]
    fn undo_commits_open_transaction_first() {
        let mut rope = Rope::from_str("");
        let mut h = History::new();
        h.begin(0);
        insert(&mut rope, &mut h, 0, "typed");

        assert_eq!(h.undo(&mut rope), Some(0));
        assert_eq!(rope.to_string(), "");
        assert_eq!(h.undo(&mut rope), None);
    }

    #[test]
    fn edits_without_transaction_are_not_recorded() {
        let mut rope = Rope::from_str("x");
        let mut h = History::new();
        h.record_insert(0, "x");
        assert_eq!(h.undo(&mut rope), None);
    }
}
