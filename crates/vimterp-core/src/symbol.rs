//! Command symbols.
//!
//! The parser yields raw tokens such as `"dd"`, `"fx"` or `"$"`. Before
//! dispatch each token is resolved to a [`Symbol`], so the engine matches on
//! an exhaustive enum instead of on punctuation. Tokens that take an argument
//! (`f`, `F`, `t`, `T`, `r`, `"`, and `i`/`a` in visual mode) carry it in
//! the variant.
//!
//! Punctuation keys also have canonical spelled-out names (`SPACE`,
//! `DOLLAR`, `yDOLLAR`, ...) used in logs and error messages.

use std::fmt;

/// Every command the engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    // -- Motions ------------------------------------------------------------
    /// `h`
    Left,
    /// `j`
    Down,
    /// `k`
    Up,
    /// `l`
    Right,
    /// `w`
    WordForward,
    /// `b`
    WordBackward,
    /// `e`
    WordEnd,
    /// `f{c}`
    FindForward(char),
    /// `F{c}`
    FindBackward(char),
    /// `t{c}`
    TillForward(char),
    /// `T{c}`
    TillBackward(char),
    /// space: right, wrapping onto the next line.
    Space,
    /// backspace: left, wrapping onto the previous line.
    Backspace,
    /// enter: first column of the next line.
    Return,
    /// `$`
    LineEnd,
    /// `0`
    LineStart,
    /// `^`
    FirstNonBlank,
    /// `G`
    LastLine,
    /// `gg`
    FirstLine,
    /// `H`
    ScreenTop,
    /// `M`
    ScreenMiddle,
    /// `L`
    ScreenBottom,
    /// `%`
    MatchBracket,
    /// `zz`
    CenterLine,
    /// `n`
    SearchNext,
    /// `N`
    SearchPrev,

    // -- Insert -------------------------------------------------------------
    /// `i`
    Insert,
    /// `I`
    InsertLineStart,
    /// `a`
    Append,
    /// `A`
    AppendLineEnd,
    /// `o`
    OpenBelow,
    /// `O`
    OpenAbove,

    // -- Text objects (visual) ----------------------------------------------
    /// `i{delim}`
    InnerObject(char),
    /// `a{delim}`
    AroundObject(char),

    // -- Operators and edits ------------------------------------------------
    /// `d` on a selection.
    Delete,
    /// `c` on a selection.
    Change,
    /// `y` on a selection.
    Yank,
    /// `>` on a selection.
    Indent,
    /// `<` on a selection.
    Outdent,
    /// `dd`
    DeleteLine,
    /// `cc`
    ChangeLine,
    /// `yy`
    YankLine,
    /// `>>`
    IndentLine,
    /// `<<`
    OutdentLine,
    /// `dw`
    DeleteWord,
    /// `cw`
    ChangeWord,
    /// `yw`
    YankWord,
    /// `y$`
    YankToEnd,
    /// `D`
    DeleteToEnd,
    /// `x`
    DeleteChar,
    /// `J`
    Join,
    /// `p`
    PasteAfter,
    /// `P`
    PasteBefore,
    /// `r{c}`
    Replace(char),
    /// `~`
    ToggleCase,
    /// `u`
    Undo,

    // -- Registers, modes, files --------------------------------------------
    /// `"{c}`
    SelectRegister(char),
    /// `v`
    VisualChar,
    /// `V`
    VisualLine,
    /// `ZZ`
    SaveClose,
    /// `gt`
    NextTab,
    /// `gT`
    PrevTab,
}

impl Symbol {
    /// Resolve a parser token. `None` for tokens that name no command.
    #[must_use]
    pub fn resolve(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let first = chars.next()?;
        let second = chars.next();
        if chars.next().is_some() {
            return None;
        }

        let Some(arg) = second else {
            return Self::single(first);
        };

        let symbol = match (first, arg) {
            ('f', c) => Self::FindForward(c),
            ('F', c) => Self::FindBackward(c),
            ('t', c) => Self::TillForward(c),
            ('T', c) => Self::TillBackward(c),
            ('r', c) => Self::Replace(c),
            ('"', c) => Self::SelectRegister(c),
            ('i', c) => Self::InnerObject(c),
            ('a', c) => Self::AroundObject(c),
            ('d', 'd') => Self::DeleteLine,
            ('d', 'w') => Self::DeleteWord,
            ('c', 'c') => Self::ChangeLine,
            ('c', 'w') => Self::ChangeWord,
            ('y', 'y') => Self::YankLine,
            ('y', 'w') => Self::YankWord,
            ('y', '$') => Self::YankToEnd,
            ('g', 'g') => Self::FirstLine,
            ('g', 't') => Self::NextTab,
            ('g', 'T') => Self::PrevTab,
            ('z', 'z') => Self::CenterLine,
            ('Z', 'Z') => Self::SaveClose,
            ('>', '>') => Self::IndentLine,
            ('<', '<') => Self::OutdentLine,
            _ => return None,
        };
        Some(symbol)
    }

    const fn single(ch: char) -> Option<Self> {
        let symbol = match ch {
            'h' => Self::Left,
            'j' => Self::Down,
            'k' => Self::Up,
            'l' => Self::Right,
            'w' => Self::WordForward,
            'b' => Self::WordBackward,
            'e' => Self::WordEnd,
            ' ' => Self::Space,
            '\u{8}' => Self::Backspace,
            '\r' => Self::Return,
            '$' => Self::LineEnd,
            '0' => Self::LineStart,
            '^' => Self::FirstNonBlank,
            'G' => Self::LastLine,
            'H' => Self::ScreenTop,
            'M' => Self::ScreenMiddle,
            'L' => Self::ScreenBottom,
            '%' => Self::MatchBracket,
            'n' => Self::SearchNext,
            'N' => Self::SearchPrev,
            'i' => Self::Insert,
            'I' => Self::InsertLineStart,
            'a' => Self::Append,
            'A' => Self::AppendLineEnd,
            'o' => Self::OpenBelow,
            'O' => Self::OpenAbove,
            'd' => Self::Delete,
            'c' => Self::Change,
            'y' => Self::Yank,
            '>' => Self::Indent,
            '<' => Self::Outdent,
            'D' => Self::DeleteToEnd,
            'x' => Self::DeleteChar,
            'J' => Self::Join,
            'p' => Self::PasteAfter,
            'P' => Self::PasteBefore,
            '~' => Self::ToggleCase,
            'u' => Self::Undo,
            'v' => Self::VisualChar,
            'V' => Self::VisualLine,
            _ => return None,
        };
        Some(symbol)
    }

    /// True for commands that only move the cursor.
    #[must_use]
    pub const fn is_motion(self) -> bool {
        matches!(
            self,
            Self::Left
                | Self::Down
                | Self::Up
                | Self::Right
                | Self::WordForward
                | Self::WordBackward
                | Self::WordEnd
                | Self::FindForward(_)
                | Self::FindBackward(_)
                | Self::TillForward(_)
                | Self::TillBackward(_)
                | Self::Space
                | Self::Backspace
                | Self::Return
                | Self::LineEnd
                | Self::LineStart
                | Self::FirstNonBlank
                | Self::LastLine
                | Self::FirstLine
                | Self::ScreenTop
                | Self::ScreenMiddle
                | Self::ScreenBottom
                | Self::MatchBracket
                | Self::CenterLine
                | Self::SearchNext
                | Self::SearchPrev
        )
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

// ---------------------------------------------------------------------------
// Canonical names
// ---------------------------------------------------------------------------

/// Spelled-out name of a punctuation key, if it has one.
#[must_use]
pub const fn key_name(ch: char) -> Option<&'static str> {
    let name = match ch {
        '!' => "EXCLAMATION",
        '?' => "QUESTION",
        '<' => "LESS",
        '>' => "GREATER",
        '|' => "PIPE",
        ' ' => "SPACE",
        '\u{8}' => "BACKSPACE",
        '\r' => "RETURN",
        '@' => "AT",
        '$' => "DOLLAR",
        '0' => "ZERO",
        '^' => "CARET",
        '"' => "QUOTE",
        '%' => "PERCENT",
        '~' => "TILDE",
        _ => return None,
    };
    Some(name)
}

/// A token with every punctuation key spelled out: `"y$"` becomes
/// `"yDOLLAR"`, `">>"` becomes `"GREATERGREATER"`.
#[must_use]
pub fn canonical(token: &str) -> String {
    token
        .chars()
        .fold(String::with_capacity(token.len()), |mut out, ch| {
            match key_name(ch) {
                Some(name) => out.push_str(name),
                None => out.push(ch),
            }
            out
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_keys() {
        assert_eq!(Symbol::resolve("h"), Some(Symbol::Left));
        assert_eq!(Symbol::resolve("$"), Some(Symbol::LineEnd));
        assert_eq!(Symbol::resolve(" "), Some(Symbol::Space));
        assert_eq!(Symbol::resolve("\r"), Some(Symbol::Return));
        assert_eq!(Symbol::resolve("\u{8}"), Some(Symbol::Backspace));
        assert_eq!(Symbol::resolve("~"), Some(Symbol::ToggleCase));
    }

    #[test]
    fn doubled_and_prefixed_keys() {
        assert_eq!(Symbol::resolve("dd"), Some(Symbol::DeleteLine));
        assert_eq!(Symbol::resolve("y$"), Some(Symbol::YankToEnd));
        assert_eq!(Symbol::resolve("gT"), Some(Symbol::PrevTab));
        assert_eq!(Symbol::resolve(">>"), Some(Symbol::IndentLine));
        assert_eq!(Symbol::resolve("fx"), Some(Symbol::FindForward('x')));
        assert_eq!(Symbol::resolve("r "), Some(Symbol::Replace(' ')));
        assert_eq!(Symbol::resolve("\"a"), Some(Symbol::SelectRegister('a')));
        assert_eq!(Symbol::resolve("i("), Some(Symbol::InnerObject('(')));
    }

    #[test]
    fn unknown_tokens() {
        assert_eq!(Symbol::resolve(""), None);
        assert_eq!(Symbol::resolve("q"), None);
        assert_eq!(Symbol::resolve("dq"), None);
        assert_eq!(Symbol::resolve("ma"), None);
        assert_eq!(Symbol::resolve("ddd"), None);
    }

    #[test]
    fn motion_classification() {
        assert!(Symbol::FindForward('x').is_motion());
        assert!(Symbol::SearchPrev.is_motion());
        assert!(!Symbol::DeleteLine.is_motion());
        assert!(!Symbol::VisualChar.is_motion());
    }

    #[test]
    fn canonical_names() {
        assert_eq!(canonical("y$"), "yDOLLAR");
        assert_eq!(canonical(">>"), "GREATERGREATER");
        assert_eq!(canonical(" "), "SPACE");
        assert_eq!(canonical("dd"), "dd");
    }
}
