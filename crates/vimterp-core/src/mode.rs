//! Vim-style modes.
//!
//! The interpreter is always in exactly one [`Mode`]:
//!
//! | Mode          | Entered by             | Cursor may rest on        | Keys mean          |
//! |---------------|------------------------|---------------------------|--------------------|
//! | Normal        | Esc, finished operator | last char of the line     | commands           |
//! | Insert        | `i a I A o O c`        | one past the last char    | text               |
//! | Visual(Char)  | `v`                    | the line break            | selection commands |
//! | Visual(Line)  | `V`                    | the line break            | selection commands |
//!
//! Block-wise visual mode is not provided.

use std::fmt;

/// The sub-mode of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// `v`: character-wise, both ends inclusive.
    Char,
    /// `V`: line-wise, always whole lines.
    Line,
}

impl fmt::Display for VisualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char => f.write_str("VISUAL"),
            Self::Line => f.write_str("VISUAL LINE"),
        }
    }
}

/// The current mode. A pure data type; transitions live in the engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual(VisualKind),
}

impl Mode {
    /// Name for a host status label.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Visual(VisualKind::Char) => "VISUAL",
            Self::Visual(VisualKind::Line) => "VISUAL LINE",
        }
    }

    /// True if the cursor may sit past the end of the document.
    #[inline]
    #[must_use]
    pub const fn cursor_past_end(self) -> bool {
        matches!(self, Self::Insert)
    }

    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual(_))
    }

    #[inline]
    #[must_use]
    pub const fn visual_kind(self) -> Option<VisualKind> {
        match self {
            Self::Visual(kind) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
