//! Registers: storage for yanked and deleted text.
//!
//! Every yank and delete copies text into registers; `p` / `P` read it back.
//! A register remembers how its text was captured, because paste behaves
//! differently for each kind:
//!
//! - **Char-wise**: `p` inserts after the cursor, `P` before it.
//! - **Line-wise**: `p` inserts whole lines below, `P` above.
//! - **Block-wise**: reserved for block selections; pasted as char-wise.
//!
//! ## Register names
//!
//! | Name        | Role                                                      |
//! |-------------|-----------------------------------------------------------|
//! | `"`         | unnamed: receives every write, read by default            |
//! | `0`         | receives every write alongside the unnamed register        |
//! | `1`–`9`     | delete history: line-wise or multi-line cuts shift in here |
//! | `-`         | small delete: cuts within one line                         |
//! | `a`–`z`     | named: overwrite                                           |
//! | `A`–`Z`     | named: append to the lowercase register                    |
//! | `_`         | black hole: writes vanish, reads are empty                 |
//!
//! A register is selected with `"x` before a command. The selection applies
//! to exactly one read or write and then reverts to the unnamed register.

use std::fmt;

/// How the register content was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    Char,
    Line,
    Block,
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char => f.write_str("char"),
            Self::Line => f.write_str("line"),
            Self::Block => f.write_str("block"),
        }
    }
}

/// A single register slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    content: String,
    kind: RegisterKind,
}

impl Register {
    #[must_use]
    pub fn new(content: impl Into<String>, kind: RegisterKind) -> Self {
        Self {
            content: content.into(),
            kind,
        }
    }

    /// Append text (for uppercase register names).
    ///
    /// If either side is line-wise the result is line-wise, with a newline
    /// separator when the existing content lacks one.
    pub fn append(&mut self, text: &str, kind: RegisterKind) {
        if kind == RegisterKind::Line || self.kind == RegisterKind::Line {
            if !self.content.is_empty() && !self.content.ends_with('\n') {
                self.content.push('\n');
            }
            self.content.push_str(text);
            self.kind = RegisterKind::Line;
        } else {
            self.content.push_str(text);
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn kind(&self) -> RegisterKind {
        self.kind
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// ── Register names ──────────────────────────────────────────────────────

/// A register a command can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterName {
    #[default]
    Unnamed,
    /// `0`–`9`.
    Numbered(u8),
    /// `-`.
    SmallDelete,
    /// `a`–`z`, stored lowercase.
    Named(char),
    /// `A`–`Z`, stored as the lowercase register it appends to.
    Append(char),
    /// `_`.
    BlackHole,
}

impl RegisterName {
    /// Parse the char following `"`. `None` for names this store does not
    /// hold (`%`, `:`, `.`, ...).
    #[must_use]
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '"' => Some(Self::Unnamed),
            '0'..='9' => ch.to_digit(10).and_then(|d| u8::try_from(d).ok()).map(Self::Numbered),
            '-' => Some(Self::SmallDelete),
            'a'..='z' => Some(Self::Named(ch)),
            'A'..='Z' => Some(Self::Append(ch.to_ascii_lowercase())),
            '_' => Some(Self::BlackHole),
            _ => None,
        }
    }
}

impl fmt::Display for RegisterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unnamed => f.write_str("\""),
            Self::Numbered(n) => write!(f, "{n}"),
            Self::SmallDelete => f.write_str("-"),
            Self::Named(ch) => write!(f, "{ch}"),
            Self::Append(ch) => write!(f, "{}", ch.to_ascii_uppercase()),
            Self::BlackHole => f.write_str("_"),
        }
    }
}

// ── Register store ──────────────────────────────────────────────────────

/// The complete set of registers plus the one-shot selector.
#[derive(Debug, Default)]
pub struct RegisterStore {
    unnamed: Option<Register>,
    numbered: [Option<Register>; 10],
    small_delete: Option<Register>,
    named: [Option<Register>; 26],
    selected: RegisterName,
}

impl RegisterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Target `name` with the next read or write.
    pub const fn select(&mut self, name: RegisterName) {
        self.selected = name;
    }

    #[must_use]
    pub const fn selected(&self) -> RegisterName {
        self.selected
    }

    /// Store `text` in the selected register and reset the selector.
    ///
    /// - the unnamed register and `0` always receive the text (for an
    ///   append target, the unnamed register gets the combined text);
    /// - a cut that is line-wise or spans a line break shifts `1`..`8`
    ///   down into `2`..`9` and stores the text in `1`;
    /// - any other cut also lands in `-`;
    /// - an explicit named or numbered target is written last.
    pub fn write(&mut self, text: &str, kind: RegisterKind, cut: bool) {
        let target = std::mem::take(&mut self.selected);
        if target == RegisterName::BlackHole {
            return;
        }

        let entry = Register::new(text, kind);

        if cut && (kind == RegisterKind::Line || text.contains('\n')) {
            // 1..=8 shift into 2..=9; the old 9 lands in 1 and is replaced.
            self.numbered[1..].rotate_right(1);
            self.numbered[1] = Some(entry.clone());
        } else if cut {
            self.small_delete = Some(entry.clone());
        }
        self.numbered[0] = Some(entry.clone());

        self.unnamed = Some(match target {
            RegisterName::Named(ch) => {
                let slot = &mut self.named[letter_index(ch)];
                *slot = Some(entry.clone());
                entry
            }
            RegisterName::Append(ch) => {
                let slot = &mut self.named[letter_index(ch)];
                match slot {
                    Some(existing) => existing.append(text, kind),
                    None => *slot = Some(entry),
                }
                slot.clone().unwrap_or_else(|| Register::new(text, kind))
            }
            RegisterName::Numbered(n) => {
                if let Some(slot) = self.numbered.get_mut(usize::from(n)) {
                    *slot = Some(entry.clone());
                }
                entry
            }
            RegisterName::SmallDelete => {
                self.small_delete = Some(entry.clone());
                entry
            }
            RegisterName::Unnamed | RegisterName::BlackHole => entry,
        });
    }

    /// Read the selected register and reset the selector. `None` for a
    /// register that was never written (and always for the black hole).
    pub fn read(&mut self) -> Option<Register> {
        let target = std::mem::take(&mut self.selected);
        self.peek(target).cloned()
    }

    /// Look at a register without touching the selector.
    #[must_use]
    pub fn peek(&self, name: RegisterName) -> Option<&Register> {
        match name {
            RegisterName::Unnamed => self.unnamed.as_ref(),
            RegisterName::Numbered(n) => self.numbered.get(usize::from(n))?.as_ref(),
            RegisterName::SmallDelete => self.small_delete.as_ref(),
            RegisterName::Named(ch) | RegisterName::Append(ch) => {
                self.named[letter_index(ch)].as_ref()
            }
            RegisterName::BlackHole => None,
        }
    }

    /// Load text from outside (the system clipboard) into the unnamed
    /// register only.
    pub fn load_unnamed(&mut self, text: &str, kind: RegisterKind) {
        self.unnamed = Some(Register::new(text, kind));
    }
}

fn letter_index(ch: char) -> usize {
    (ch.to_ascii_lowercase() as usize).saturating_sub('a' as usize) % 26
}

// ── Tests ──────────────────────────────────────────────────────────────
