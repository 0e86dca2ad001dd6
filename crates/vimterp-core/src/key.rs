//! Key events and key notation.
//!
//! The host delivers one [`KeyEvent`] per keystroke. Scripts and tests can
//! spell key sequences in Vim's angle-bracket notation and turn them into
//! events with [`parse_keys`]:
//!
//! ```text
//! dd3j<Esc>:w<CR>      <C-v>    <Space>    <BS>    <lt>
//! ```
//!
//! Unknown `<...>` groups are taken literally, one char at a time, so every
//! input string produces some event sequence.

use bitflags::bitflags;

// ─── Event types ────────────────────────────────────────────────────────────

/// A keyboard event with key identity and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

/// Identity of a key.
///
/// Printable characters use [`Char`](KeyCode::Char); the named keys are the
/// ones the interpreter reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// A printable character with no modifiers.
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::plain(KeyCode::Char(ch))
    }

    /// `Ctrl` + `ch`.
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), Modifiers::CTRL)
    }

    /// True for `Ctrl` + `ch` (case-insensitive on `ch`).
    #[must_use]
    pub fn is_ctrl(&self, ch: char) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
            && matches!(self.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&ch))
    }

    /// The char this key types into pending input, if any.
    ///
    /// Printable chars map to themselves; `Enter`, `Backspace` and `Tab` map
    /// to the control characters Vim uses for them in mappings. Keys held
    /// with `Ctrl` or `Alt` type nothing.
    #[must_use]
    pub fn typed_char(&self) -> Option<char> {
        if self.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) {
            return None;
        }
        match self.code {
            KeyCode::Char(c) => Some(c),
            KeyCode::Enter => Some('\r'),
            KeyCode::Backspace => Some('\u{8}'),
            KeyCode::Tab => Some('\t'),
            _ => None,
        }
    }
}

impl From<char> for KeyEvent {
    fn from(ch: char) -> Self {
        Self::char(ch)
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::plain(code)
    }
}

// ─── Key notation ───────────────────────────────────────────────────────────

/// Parse a key sequence written in Vim notation.
///
/// Plain chars become [`KeyEvent::char`]. Bracketed names are matched
/// case-insensitively: `<Esc>`, `<CR>`/`<Enter>`/`<Return>`, `<BS>`,
/// `<Tab>`, `<Del>`, `<Space>`, `<lt>`, `<Up>`, `<Down>`, `<Left>`,
/// `<Right>`, `<Home>`, `<End>`, and `<C-x>` / `<A-x>` / `<S-x>` modifier
/// forms.
#[must_use]
pub fn parse_keys(notation: &str) -> Vec<KeyEvent> {
    let mut keys = Vec::new();
    let mut rest = notation;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            let bracketed = rest
                .find('>')
                .and_then(|close| Some((close, parse_bracketed(&rest[1..close])?)));
            if let Some((close, key)) = bracketed {
                keys.push(key);
                rest = &rest[close + 1..];
                continue;
            }
        }
        keys.push(KeyEvent::char(ch));
        rest = &rest[ch.len_utf8()..];
    }

    keys
}

/// Parse the inside of a `<...>` group. `None` means "not a key name".
fn parse_bracketed(name: &str) -> Option<KeyEvent> {
    if let Some((prefix, key)) = name.split_once('-').filter(|(_, key)| !key.is_empty()) {
        let modifiers = match prefix.to_ascii_lowercase().as_str() {
            "c" => Modifiers::CTRL,
            "a" | "m" => Modifiers::ALT,
            "s" => Modifiers::SHIFT,
            _ => return None,
        };
        let base = parse_bracketed(key).or_else(|| {
            let mut chars = key.chars();
            let ch = chars.next()?;
            chars.next().is_none().then(|| KeyEvent::char(ch))
        })?;
        return Some(KeyEvent::new(base.code, base.modifiers | modifiers));
    }

    let code = match name.to_ascii_lowercase().as_str() {
        "esc" => KeyCode::Escape,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" | "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "del" | "delete" => KeyCode::Delete,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        "bar" => KeyCode::Char('|'),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        _ => return None,
    };
    Some(KeyEvent::plain(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_chars_map_one_to_one() {
        let keys = parse_keys("dd");
        assert_eq!(keys, vec![KeyEvent::char('d'), KeyEvent::char('d')]);
    }

    #[test]
    fn named_keys_are_case_insensitive() {
        let keys = parse_keys("<Esc><esc><CR><bs><Space>");
        assert_eq!(
            keys,
            vec![
                KeyEvent::plain(KeyCode::Escape),
                KeyEvent::plain(KeyCode::Escape),
                KeyEvent::plain(KeyCode::Enter),
                KeyEvent::plain(KeyCode::Backspace),
                KeyEvent::char(' '),
            ]
        );
    }

    #[test]
    fn lt_escapes_a_literal_angle_bracket() {
        assert_eq!(parse_keys("<lt><lt>"), vec![KeyEvent::char('<'); 2]);
    }

    #[test]
    fn unknown_group_is_taken_literally() {
        let keys = parse_keys("<foo>");
        assert_eq!(keys.len(), 5);
        assert_eq!(keys[0], KeyEvent::char('<'));
        assert_eq!(keys[4], KeyEvent::char('>'));
    }

    #[test]
    fn lone_angle_brackets_are_literal() {
        assert_eq!(parse_keys(">>"), vec![KeyEvent::char('>'); 2]);
        assert_eq!(parse_keys("<"), vec![KeyEvent::char('<')]);
    }

    #[test]
    fn ctrl_modifier_form() {
        let keys = parse_keys("<C-v>");
        assert_eq!(keys, vec![KeyEvent::ctrl('v')]);
        assert!(keys[0].is_ctrl('v'));
        assert!(keys[0].is_ctrl('V'));
        assert_eq!(keys[0].typed_char(), None);
    }

    #[test]
    fn typed_char_for_named_keys() {
        assert_eq!(KeyEvent::plain(KeyCode::Enter).typed_char(), Some('\r'));
        assert_eq!(KeyEvent::plain(KeyCode::Backspace).typed_char(), Some('\u{8}'));
        assert_eq!(KeyEvent::plain(KeyCode::Up).typed_char(), None);
        assert_eq!(KeyEvent::char('x').typed_char(), Some('x'));
    }

    #[test]
    fn mixed_script() {
        let keys = parse_keys("x:w<CR>");
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[3], KeyEvent::plain(KeyCode::Enter));
    }
}
