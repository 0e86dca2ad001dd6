//! Collaborator interfaces.
//!
//! The interpreter owns no text. It drives two collaborators supplied by the
//! embedding application:
//!
//! - [`TextBuffer`]: the document: text access, a cursor, edits, undo, word
//!   boundaries, and a presentation-only decoration channel.
//! - [`Host`]: fire-and-forget application actions: save, close, tabs,
//!   clipboard, viewport queries, error and message reporting.
//!
//! Offsets are absolute char indices. Lines are separated by `\n`; a document
//! ending in `\n` has an empty last line, and an empty document has one line.

use std::ops::Range;

use crate::error::EngineError;
use crate::mode::Mode;
use crate::position::Position;

// ---------------------------------------------------------------------------
// TextBuffer
// ---------------------------------------------------------------------------

/// Presentation layers the engine publishes through [`TextBuffer::decorate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// The block cursor drawn while not inserting.
    Cursor,
    /// The active visual selection.
    Visual,
    /// All matches of the last search.
    Search,
}

impl Layer {
    pub const ALL: [Self; 3] = [Self::Cursor, Self::Visual, Self::Search];
}

/// The document the interpreter edits.
///
/// Implementors provide the required primitives; everything else is derived.
pub trait TextBuffer {
    fn len_chars(&self) -> usize;

    fn line_count(&self) -> usize;

    /// Offset of the first char of `line`. `line >= line_count()` yields
    /// `len_chars()`.
    fn line_to_char(&self, line: usize) -> usize;

    /// Line containing offset `idx`. `idx == len_chars()` is on the last line.
    fn char_to_line(&self, idx: usize) -> usize;

    fn char_at(&self, idx: usize) -> Option<char>;

    /// Text in `range`, clamped to the document.
    fn slice(&self, range: Range<usize>) -> String;

    fn cursor(&self) -> usize;

    fn set_cursor(&mut self, idx: usize);

    /// Replace `range` with `text`. The cursor is left where the
    /// implementation puts it; the engine sets it explicitly afterwards.
    fn replace(&mut self, range: Range<usize>, text: &str);

    /// Undo one step. Returns `false` when there is nothing to undo.
    fn undo(&mut self) -> bool;

    /// Start of the next word after `idx` (`len_chars()` when none).
    fn next_word_start(&self, idx: usize) -> usize;

    /// Start of the previous word before `idx`.
    fn prev_word_start(&self, idx: usize) -> usize;

    /// Last char of the word at or after `idx`.
    fn word_end(&self, idx: usize) -> usize;

    /// Open an undo group. Groups nest; only the outermost one counts.
    fn begin_edit(&mut self) {}

    fn end_edit(&mut self) {}

    /// Replace the spans shown on `layer`. Purely presentational.
    fn decorate(&mut self, _layer: Layer, _spans: &[Range<usize>]) {}

    // -- Derived ------------------------------------------------------------

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Offset just past the last content char of `line` (the position of its
    /// line break, or the document end).
    fn line_end(&self, line: usize) -> usize {
        if line + 1 < self.line_count() {
            self.line_to_char(line + 1).saturating_sub(1)
        } else {
            self.len_chars()
        }
    }

    /// Content length of `line`, excluding the line break.
    fn line_len(&self, line: usize) -> usize {
        self.line_end(line) - self.line_to_char(line).min(self.line_end(line))
    }

    /// Text of `line` without its line break.
    fn line_text(&self, line: usize) -> String {
        self.slice(self.line_to_char(line)..self.line_end(line))
    }

    fn text(&self) -> String {
        self.slice(0..self.len_chars())
    }

    /// The (line, col) of offset `idx`.
    fn position(&self, idx: usize) -> Position {
        let idx = idx.min(self.len_chars());
        let line = self.char_to_line(idx);
        Position::new(line, idx - self.line_to_char(line))
    }

    /// The offset of `pos`, clamping the line to the document and the column
    /// to the line's end.
    fn offset(&self, pos: Position) -> usize {
        let line = pos.line.min(self.line_count().saturating_sub(1));
        let start = self.line_to_char(line);
        start + pos.col.min(self.line_len(line))
    }

    fn insert(&mut self, idx: usize, text: &str) {
        self.replace(idx..idx, text);
    }

    fn delete(&mut self, range: Range<usize>) {
        self.replace(range, "");
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// Application-level actions. Every method defaults to doing nothing, so a
/// host implements only what it supports.
pub trait Host {
    fn save(&mut self) {}

    fn close(&mut self) {}

    fn new_file(&mut self) {}

    /// Revert the current file to its on-disk contents.
    fn reload(&mut self) {}

    fn open_dialog(&mut self) {}

    fn next_tab(&mut self) {}

    fn prev_tab(&mut self) {}

    /// Switch to tab `index` (0-based).
    fn goto_tab(&mut self, _index: usize) {}

    /// Scroll so `line` is vertically centered.
    fn center_line(&mut self, _line: usize) {}

    /// Mirror a yank or cut to the system clipboard.
    fn set_clipboard(&mut self, _text: &str) {}

    /// First and last visible line, inclusive. `None` means the whole
    /// document is visible.
    fn viewport(&self) -> Option<(usize, usize)> {
        None
    }

    fn mode_changed(&mut self, _mode: Mode) {}

    /// A non-fatal error the engine absorbed.
    fn report(&mut self, _error: &EngineError) {}

    /// Informational text, such as the answer to `:set shiftwidth?`.
    fn message(&mut self, _text: &str) {}
}

impl Host for () {}

/// A host action, as captured by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    Save,
    Close,
    NewFile,
    Reload,
    OpenDialog,
    NextTab,
    PrevTab,
    GotoTab(usize),
    CenterLine(usize),
    Clipboard(String),
}

/// A [`Host`] that records what it is asked to do.
///
/// Headless embedders drain [`actions`](Self::take_actions) after each key
/// and carry them out against their own state.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub actions: Vec<HostAction>,
    pub errors: Vec<String>,
    pub messages: Vec<String>,
    pub modes: Vec<Mode>,
    pub viewport: Option<(usize, usize)>,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every recorded action, leaving the log empty.
    pub fn take_actions(&mut self) -> Vec<HostAction> {
        std::mem::take(&mut self.actions)
    }

    /// The text of the most recent clipboard write, if any.
    #[must_use]
    pub fn clipboard(&self) -> Option<&str> {
        self.actions.iter().rev().find_map(|a| match a {
            HostAction::Clipboard(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Host for RecordingHost {
    fn save(&mut self) {
        self.actions.push(HostAction::Save);
    }

    fn close(&mut self) {
        self.actions.push(HostAction::Close);
    }

    fn new_file(&mut self) {
        self.actions.push(HostAction::NewFile);
    }

    fn reload(&mut self) {
        self.actions.push(HostAction::Reload);
    }

    fn open_dialog(&mut self) {
        self.actions.push(HostAction::OpenDialog);
    }

    fn next_tab(&mut self) {
        self.actions.push(HostAction::NextTab);
    }

    fn prev_tab(&mut self) {
        self.actions.push(HostAction::PrevTab);
    }

    fn goto_tab(&mut self, index: usize) {
        self.actions.push(HostAction::GotoTab(index));
    }

    fn center_line(&mut self, line: usize) {
        self.actions.push(HostAction::CenterLine(line));
    }

    fn set_clipboard(&mut self, text: &str) {
        self.actions.push(HostAction::Clipboard(text.to_string()));
    }

    fn viewport(&self) -> Option<(usize, usize)> {
        self.viewport
    }

    fn mode_changed(&mut self, mode: Mode) {
        self.modes.push(mode);
    }

    fn report(&mut self, error: &EngineError) {
        self.errors.push(error.to_string());
    }

    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    #[test]
    fn derived_line_geometry() {
        let buf = Buffer::from_text("line 1\nline 2\n");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_end(0), 6);
        assert_eq!(buf.line_len(1), 6);
        assert_eq!(buf.line_len(2), 0);
        assert_eq!(buf.line_text(1), "line 2");
        assert_eq!(buf.line_text(2), "");
    }

    #[test]
    fn position_and_offset_round_trip() {
        let buf = Buffer::from_text("ab\ncde");
        assert_eq!(buf.position(4), Position::new(1, 1));
        assert_eq!(buf.offset(Position::new(1, 1)), 4);
        assert_eq!(buf.position(6), Position::new(1, 3));
    }

    #[test]
    fn offset_clamps_line_and_column() {
        let buf = Buffer::from_text("ab\ncde");
        assert_eq!(buf.offset(Position::new(0, 50)), 2);
        assert_eq!(buf.offset(Position::new(9, 1)), 4);
    }

    #[test]
    fn recording_host_logs_actions() {
        let mut host = RecordingHost::new();
        host.save();
        host.set_clipboard("x");
        host.goto_tab(2);
        assert_eq!(host.clipboard(), Some("x"));
        assert_eq!(
            host.take_actions(),
            vec![
                HostAction::Save,
                HostAction::Clipboard("x".into()),
                HostAction::GotoTab(2)
            ]
        );
        assert!(host.actions.is_empty());
    }

    #[test]
    fn unit_host_is_inert() {
        let mut host = ();
        host.save();
        assert_eq!(host.viewport(), None);
    }
}
