//! Line/column positions.
//!
//! The interpreter addresses text by absolute char offset, the way the host
//! buffer does. `Position` is the (line, col) view of such an offset, used
//! wherever a command reasons about lines: vertical motions, line-wise
//! operators, indentation, goto-line.
//!
//! All coordinates are **0-indexed** and columns count chars, not bytes.
//! Colon commands such as `:12` are 1-indexed; that conversion happens at the
//! command layer, never here.

use std::fmt;

/// A position in a text buffer: (line, column), both 0-indexed.
///
/// `col` is the char offset from the start of the line. For `"café\n"`,
/// column 3 is `'é'` and column 4 is the line break.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

// Line first, then column.
impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for human display, matching Vim's `line:col` ruler.
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}
