//! Delimiter text objects and `%` bracket matching.
//!
//! In character-wise visual mode `i<delim>` selects the text inside the
//! nearest enclosing delimiter pair and `a<delim>` selects it together with
//! the delimiters:
//!
//! | Delimiters      | Pair        |
//! |-----------------|-------------|
//! | `(` `)`         | parentheses |
//! | `[` `]`         | brackets    |
//! | `{` `}`         | braces      |
//! | `<` `>`         | angles      |
//! | `"`             | double quotes |
//! | `'`             | single quotes |
//!
//! The enclosing pair is found with one stack that holds every kind of
//! delimiter at once, so a quote or a different bracket kind between the
//! cursor and the opener must itself be balanced. Ranges are half-open char
//! offsets. An unmatched delimiter yields `None`; so does an empty interior
//! for `i`, since a visual selection always covers at least one char.

use std::ops::Range;

use crate::adapter::TextBuffer;

const OPENERS: [char; 6] = ['(', '[', '{', '<', '"', '\''];
const CLOSERS: [char; 6] = [')', ']', '}', '>', '"', '\''];

/// The closing partner of `ch`, if it is an opener (quotes close themselves).
const fn closing(ch: char) -> Option<char> {
    match ch {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '<' => Some('>'),
        '"' | '\'' => Some(ch),
        _ => None,
    }
}

/// The opening partner of `ch`, if it is a closer.
const fn opening(ch: char) -> Option<char> {
    match ch {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        '>' => Some('<'),
        '"' | '\'' => Some(ch),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Text objects
// ---------------------------------------------------------------------------

/// Whether the object includes its delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectScope {
    /// `i`: the interior only.
    Inner,
    /// `a`: interior plus both delimiters.
    Around,
}

/// Offsets of the delimiter pair enclosing `cursor`, for either half of the
/// pair given as `delim`.
#[must_use]
pub fn enclosing_pair<B: TextBuffer + ?Sized>(
    buf: &B,
    cursor: usize,
    delim: char,
) -> Option<(usize, usize)> {
    let open = if OPENERS.contains(&delim) {
        delim
    } else {
        opening(delim)?
    };
    let close = closing(open)?;

    // Sitting on an opening bracket selects the pair it starts.
    let open_idx = if !is_quote(open) && buf.char_at(cursor) == Some(open) {
        cursor
    } else {
        scan_backward(buf, cursor, close)?
    };
    let close_idx = scan_forward(buf, open_idx + 1, open)?;
    Some((open_idx, close_idx))
}

/// The `i`/`a` text object for `delim` around `cursor`.
#[must_use]
pub fn delimited<B: TextBuffer + ?Sized>(
    buf: &B,
    cursor: usize,
    delim: char,
    scope: ObjectScope,
) -> Option<Range<usize>> {
    let (open, close) = enclosing_pair(buf, cursor, delim)?;
    match scope {
        ObjectScope::Inner if open + 1 < close => Some(open + 1..close),
        ObjectScope::Inner => None,
        ObjectScope::Around => Some(open..close + 1),
    }
}

/// Walk left from just before `cursor` until the stack seeded with `close`
/// empties; that char is the opener.
fn scan_backward<B: TextBuffer + ?Sized>(buf: &B, cursor: usize, close: char) -> Option<usize> {
    let mut stack = vec![close];
    for i in (0..cursor.min(buf.len_chars())).rev() {
        let ch = buf.char_at(i)?;
        if stack.last().copied().and_then(opening) == Some(ch) {
            stack.pop();
        } else if CLOSERS.contains(&ch) {
            stack.push(ch);
        }
        if stack.is_empty() {
            return Some(i);
        }
    }
    None
}

/// Walk right from `from` until the stack seeded with `open` empties; that
/// char is the closer.
fn scan_forward<B: TextBuffer + ?Sized>(buf: &B, from: usize, open: char) -> Option<usize> {
    let mut stack = vec![open];
    for i in from..buf.len_chars() {
        let ch = buf.char_at(i)?;
        if stack.last().copied().and_then(closing) == Some(ch) {
            stack.pop();
        } else if OPENERS.contains(&ch) {
            stack.push(ch);
        }
        if stack.is_empty() {
            return Some(i);
        }
    }
    None
}

const fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'')
}

// ---------------------------------------------------------------------------
// Bracket matching
// ---------------------------------------------------------------------------

/// Target of `%`: find the first bracket at or after `cursor` and return the
/// offset of its partner. Supports `()`, `[]`, `{}`. Scans across lines.
#[must_use]
pub fn match_bracket<B: TextBuffer + ?Sized>(buf: &B, cursor: usize) -> Option<usize> {
    let len = buf.len_chars();
    let (start, ch) = (cursor..len)
        .filter_map(|i| buf.char_at(i).map(|c| (i, c)))
        .find(|(_, c)| "()[]{}".contains(*c))?;

    let (open, close, forward) = match ch {
        '(' => ('(', ')', true),
        '[' => ('[', ']', true),
        '{' => ('{', '}', true),
        ')' => ('(', ')', false),
        ']' => ('[', ']', false),
        '}' => ('{', '}', false),
        _ => return None,
    };

    let mut depth: usize = 0;
    if forward {
        for i in start..len {
            let c = buf.char_at(i)?;
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
    } else {
        for i in (0..=start).rev() {
            let c = buf.char_at(i)?;
            if c == close {
                depth += 1;
            } else if c == open {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
