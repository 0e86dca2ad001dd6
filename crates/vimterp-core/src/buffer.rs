//! Text buffer: a rope-backed [`TextBuffer`].
//!
//! `Buffer` is the reference document the interpreter runs against when the
//! embedding application has no buffer of its own: the CLI host and the
//! engine tests both use it.
//!
//! # Design choices
//!
//! - **ropey** gives O(log n) edits and line indexing with sound Unicode
//!   handling. Offsets are char indices; byte offsets never leak out.
//!
//! - **Line endings are normalized to `\n` on load** and restored on save.
//!   The `line_ending` field records the style found in the file, so the
//!   interpreter only ever sees `\n` separators.
//!
//! - **Undo lives here**, in a [`History`], because the interpreter
//!   delegates undo to its buffer. Every `replace` outside an explicit
//!   `begin_edit`/`end_edit` group is its own undo step.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use ropey::Rope;

use crate::adapter::{Layer, TextBuffer};
use crate::error::{EngineError, Result};
use crate::history::History;
use crate::word;

// ---------------------------------------------------------------------------
// Line ending detection
// ---------------------------------------------------------------------------

/// Line ending style of a file. Defaults to `Lf` for new buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Detect the line ending style from its first occurrence in `text`.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        for (i, &byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => return Self::Lf,
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => return Self::CrLf,
                b'\r' => return Self::Cr,
                _ => {}
            }
        }
        Self::Lf
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lf => f.write_str("LF"),
            Self::CrLf => f.write_str("CRLF"),
            Self::Cr => f.write_str("CR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A text buffer backed by a rope, with a cursor and undo history.
pub struct Buffer {
    rope: Rope,
    cursor: usize,
    history: History,
    /// Nesting depth of `begin_edit` groups.
    edit_depth: usize,
    decorations: HashMap<Layer, Vec<Range<usize>>>,
    path: Option<PathBuf>,
    modified: bool,
    line_ending: LineEnding,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer with no file path.
    #[must_use]
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Create a buffer from a string. Line endings are normalized to `\n`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            line_ending: LineEnding::detect(text),
            rope: Rope::from_str(&normalize_line_endings(text, "\n")),
            cursor: 0,
            history: History::new(),
            edit_depth: 0,
            decorations: HashMap::new(),
            path: None,
            modified: false,
        }
    }

    /// Load a buffer from a file. The buffer starts unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut buf = Self::from_text(&text);
        buf.path = Some(path.to_path_buf());
        Ok(buf)
    }

    // -- Metadata -----------------------------------------------------------

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    #[must_use]
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Spans last published on `layer`.
    #[must_use]
    pub fn decorations(&self, layer: Layer) -> &[Range<usize>] {
        self.decorations.get(&layer).map_or(&[], Vec::as_slice)
    }

    // -- File I/O -----------------------------------------------------------

    /// Write the buffer back to its file, restoring the original line
    /// ending style. Marks the buffer unmodified on success.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is set or the write fails.
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or_else(|| {
            EngineError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "buffer has no file path",
            ))
        })?;
        self.save_as(&path)
    }

    /// Write the buffer to `path` and remember it as the buffer's file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        let content = normalize_line_endings(&self.rope.to_string(), self.line_ending.as_str());
        fs::write(path, content)?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Replace the whole content with the file on disk, dropping history.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is set or the read fails.
    pub fn reload(&mut self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Err(EngineError::Unsupported("reload without a file".into()));
        };
        let fresh = Self::from_file(&path)?;
        let cursor = self.cursor.min(fresh.rope.len_chars());
        *self = fresh;
        self.cursor = cursor;
        Ok(())
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.rope.len_chars();
        let end = range.end.min(len);
        range.start.min(end)..end
    }
}

impl TextBuffer for Buffer {
    #[inline]
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    #[inline]
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_to_char(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            self.rope.len_chars()
        } else {
            self.rope.line_to_char(line)
        }
    }

    fn char_to_line(&self, idx: usize) -> usize {
        self.rope.char_to_line(idx.min(self.rope.len_chars()))
    }

    fn char_at(&self, idx: usize) -> Option<char> {
        self.rope.get_char(idx)
    }

    fn slice(&self, range: Range<usize>) -> String {
        self.rope.slice(self.clamp(range)).to_string()
    }

    #[inline]
    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, idx: usize) {
        self.cursor = idx.min(self.rope.len_chars());
    }

    fn replace(&mut self, range: Range<usize>, text: &str) {
        let range = self.clamp(range);
        if range.is_empty() && text.is_empty() {
            return;
        }

        let standalone = self.edit_depth == 0;
        if standalone {
            self.history.begin(self.cursor);
        }

        if !range.is_empty() {
            let removed = self.rope.slice(range.clone()).to_string();
            self.rope.remove(range.clone());
            self.history.record_delete(range.start, &removed);
        }
        if !text.is_empty() {
            let text = normalize_line_endings(text, "\n");
            self.rope.insert(range.start, &text);
            self.history.record_insert(range.start, &text);
        }
        self.modified = true;
        self.cursor = self.cursor.min(self.rope.len_chars());

        if standalone {
            self.history.commit();
        }
    }

    fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.rope) {
            Some(cursor) => {
                self.cursor = cursor.min(self.rope.len_chars());
                self.modified = true;
                true
            }
            None => false,
        }
    }

    fn next_word_start(&self, idx: usize) -> usize {
        word::next_word_start(&self.rope, idx)
    }

    fn prev_word_start(&self, idx: usize) -> usize {
        word::prev_word_start(&self.rope, idx)
    }

    fn word_end(&self, idx: usize) -> usize {
        word::word_end(&self.rope, idx)
    }

    fn begin_edit(&mut self) {
        if self.edit_depth == 0 {
            self.history.begin(self.cursor);
        }
        self.edit_depth += 1;
    }

    fn end_edit(&mut self) {
        match self.edit_depth {
            0 => {}
            1 => {
                self.edit_depth = 0;
                self.history.commit();
            }
            _ => self.edit_depth -= 1,
        }
    }

    fn decorate(&mut self, layer: Layer, spans: &[Range<usize>]) {
        self.decorations.insert(layer, spans.to_vec());
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.rope.len_lines())
            .field("chars", &self.rope.len_chars())
            .field("cursor", &self.cursor)
            .field("modified", &self.modified)
            .field("line_ending", &self.line_ending)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Normalize `\r\n`, `\r` and `\n` in any mix to `target`.
fn normalize_line_endings(text: &str, target: &str) -> String {
    if !text.contains('\r') && target == "\n" {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                result.push_str(target);
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' => result.push_str(target),
            _ => result.push(ch),
        }
    }

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- LineEnding ---------------------------------------------------------

    #[test]
    fn line_ending_detection() {
        assert_eq!(LineEnding::detect("a\nb\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\r\nb\r\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\rb"), LineEnding::Cr);
        assert_eq!(LineEnding::detect("plain"), LineEnding::Lf);
    }

    #[test]
    fn crlf_is_normalized_internally() {
        let buf = Buffer::from_text("one\r\ntwo\r\n");
        assert_eq!(buf.text(), "one\ntwo\n");
        assert_eq!(buf.line_ending(), LineEnding::CrLf);
        assert_eq!(buf.line_count(), 3);
    }

    #[test]
    fn unicode_separators_stay_inside_a_line() {
        let buf = Buffer::from_text("a\x0bb\x0cc\u{85}d\u{2028}e\u{2029}f\ng");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_text(0), "a\x0bb\x0cc\u{85}d\u{2028}e\u{2029}f");
    }

    #[test]
    fn normalize_round_trip() {
        assert_eq!(normalize_line_endings("a\nb\n", "\r\n"), "a\r\nb\r\n");
        assert_eq!(normalize_line_endings("a\r\nb\rc", "\n"), "a\nb\nc");
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn replace_and_undo() {
        let mut buf = Buffer::from_text("hello world");
        buf.replace(0..5, "howdy");
        assert_eq!(buf.text(), "howdy world");
        assert!(buf.is_modified());

        assert!(buf.undo());
        assert_eq!(buf.text(), "hello world");
        assert!(!buf.undo());
    }

    #[test]
    fn grouped_edits_undo_together() {
        let mut buf = Buffer::from_text("abc");
        buf.begin_edit();
        buf.insert(0, "x");
        buf.begin_edit();
        buf.delete(1..2);
        buf.end_edit();
        buf.insert(3, "!");
        buf.end_edit();
        assert_eq!(buf.text(), "xbc!");

        assert!(buf.undo());
        assert_eq!(buf.text(), "abc");
        assert!(!buf.undo());
    }

    #[test]
    fn undo_restores_cursor() {
        let mut buf = Buffer::from_text("line 1\nline 2");
        buf.set_cursor(7);
        buf.delete(7..13);
        buf.set_cursor(6);
        buf.undo();
        assert_eq!(buf.cursor(), 7);
    }

    #[test]
    fn slice_and_set_cursor_clamp() {
        let mut buf = Buffer::from_text("abc");
        assert_eq!(buf.slice(1..99), "bc");
        buf.set_cursor(50);
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn word_primitives_delegate() {
        let buf = Buffer::from_text("line 2");
        assert_eq!(buf.next_word_start(0), 5);
        assert_eq!(buf.prev_word_start(5), 0);
        assert_eq!(buf.word_end(0), 3);
    }

    #[test]
    fn decorations_are_stored_per_layer() {
        let mut buf = Buffer::from_text("abc");
        buf.decorate(Layer::Search, &[0..1, 2..3]);
        assert_eq!(buf.decorations(Layer::Search), &[0..1, 2..3]);
        assert!(buf.decorations(Layer::Visual).is_empty());
    }

    // -- File I/O -----------------------------------------------------------

    #[test]
    fn save_and_reload_preserve_line_endings() {
        let dir = std::env::temp_dir().join(format!("vimterp-buffer-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("crlf.txt");
        fs::write(&path, "one\r\ntwo\r\n").unwrap();

        let mut buf = Buffer::from_file(&path).unwrap();
        buf.insert(0, "zero\n");
        buf.save().unwrap();
        assert!(!buf.is_modified());
        assert_eq!(fs::read_to_string(&path).unwrap(), "zero\r\none\r\ntwo\r\n");

        buf.insert(0, "scratch");
        buf.reload().unwrap();
        assert_eq!(buf.text(), "zero\none\ntwo\n");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn save_without_path_fails() {
        let mut buf = Buffer::from_text("x");
        assert!(buf.save().is_err());
    }
}
