//! Word boundaries: the primitives behind `w`, `b`, `e`.
//!
//! A **word** is a run of word characters (letters, digits, underscore) or a
//! run of other non-blank characters (punctuation): `hello.world` holds three
//! words. An empty line also counts as a word, so `w` and `b` stop on it.
//!
//! All functions take and return absolute char offsets into a [`Rope`].
//! [`Buffer`](crate::buffer::Buffer) exposes them through the
//! [`TextBuffer`](crate::adapter::TextBuffer) word primitives.

use ropey::Rope;

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

/// Character class for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    /// Letters, digits, underscore.
    Word,
    /// Non-blank, non-word characters (operators, brackets, etc.).
    Punctuation,
    /// Whitespace within a line (space, tab).
    Blank,
    Newline,
}

impl CharClass {
    pub(crate) const fn is_token(self) -> bool {
        matches!(self, Self::Word | Self::Punctuation)
    }
}

pub(crate) fn classify(ch: char) -> CharClass {
    if ch == '\n' || ch == '\r' {
        CharClass::Newline
    } else if ch.is_whitespace() {
        CharClass::Blank
    } else if ch.is_alphanumeric() || ch == '_' {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

// ---------------------------------------------------------------------------
// Boundaries
// ---------------------------------------------------------------------------

/// Start of the next word after `idx`.
///
/// Skips the rest of the current token, then blanks and line breaks, stopping
/// early on an empty line. Returns `rope.len_chars()` when no word follows.
#[must_use]
pub fn next_word_start(rope: &Rope, idx: usize) -> usize {
    let total = rope.len_chars();
    if idx >= total {
        return total;
    }

    let mut i = idx;
    let start_class = classify(rope.char(i));

    if start_class.is_token() {
        while i < total && classify(rope.char(i)) == start_class {
            i += 1;
        }
    }

    while i < total {
        match classify(rope.char(i)) {
            CharClass::Word | CharClass::Punctuation => break,
            CharClass::Blank => i += 1,
            CharClass::Newline => {
                i += 1;
                // Two line breaks in a row: `i` is an empty line.
                if i < total && classify(rope.char(i)) == CharClass::Newline {
                    break;
                }
            }
        }
    }

    i
}

/// Start of the word before `idx`. Returns 0 when none precedes it.
#[must_use]
pub fn prev_word_start(rope: &Rope, idx: usize) -> usize {
    let idx = idx.min(rope.len_chars());
    if idx == 0 {
        return 0;
    }

    let mut i = idx - 1;

    loop {
        match classify(rope.char(i)) {
            CharClass::Word | CharClass::Punctuation => break,
            CharClass::Newline => {
                let line_start = rope.line_to_char(rope.char_to_line(i));
                if line_start == i {
                    // A line break at column 0 is an empty line.
                    return i;
                }
                if i == 0 {
                    return 0;
                }
                i -= 1;
            }
            CharClass::Blank => {
                if i == 0 {
                    return 0;
                }
                i -= 1;
            }
        }
    }

    let class = classify(rope.char(i));
    while i > 0 && classify(rope.char(i - 1)) == class {
        i -= 1;
    }
    i
}

/// Last char of the word at or after `idx`.
///
/// Unlike Vim's `e`, this does not step off a word end first: on the last
/// char of a word it returns `idx`. Blanks and line breaks before the word
/// are skipped. Returns `idx` when no word follows.
#[must_use]
pub fn word_end(rope: &Rope, idx: usize) -> usize {
    let total = rope.len_chars();
    let mut i = idx;

    while i < total && !classify(rope.char(i)).is_token() {
        i += 1;
    }
    if i >= total {
        return idx.min(total.saturating_sub(1));
    }

    let class = classify(rope.char(i));
    while i + 1 < total && classify(rope.char(i + 1)) == class {
        i += 1;
    }
    i
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
