//! System clipboard synchronization.
//!
//! Every yank or cut the engine publishes to the host clipboard is recorded
//! here together with its [`RegisterKind`]. When the host later reports that
//! the clipboard changed, the text is compared with the last publication:
//! an echo of our own write keeps its kind, anything else came from outside
//! and is treated as character-wise text.

use crate::register::RegisterKind;

/// What a clipboard-change notification turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardChange {
    /// The host is reporting our own last write back to us.
    Echo,
    /// Someone else put text on the clipboard.
    External,
}

/// Tracks the kind tag of the clipboard contents.
#[derive(Debug, Clone)]
pub struct ClipboardSync {
    kind: RegisterKind,
    published: Option<String>,
}

impl ClipboardSync {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kind: RegisterKind::Char,
            published: None,
        }
    }

    /// Record a write of `text` made by the engine.
    pub fn publish(&mut self, text: &str, kind: RegisterKind) {
        self.kind = kind;
        self.published = Some(text.to_string());
    }

    /// Classify a change notification for `text` and update the tag.
    pub fn observe(&mut self, text: &str) -> ClipboardChange {
        if self.published.as_deref() == Some(text) {
            return ClipboardChange::Echo;
        }
        self.kind = RegisterKind::Char;
        self.published = None;
        ClipboardChange::External
    }

    /// Kind of whatever is on the clipboard now.
    #[must_use]
    pub const fn kind(&self) -> RegisterKind {
        self.kind
    }
}

impl Default for ClipboardSync {
    fn default() -> Self {
        Self::new()
    }
}
