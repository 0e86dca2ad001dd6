//! Pending-input parser.
//!
//! Keys typed in Normal and Visual mode accumulate in a pending string. After
//! every key the whole string is parsed into one of three outcomes:
//!
//! - **incomplete**: wait for more keys (`"d"`, `"12"`, `"f"`);
//! - **command**: an optional count, a command token, and the unconsumed
//!   remainder (`"3dd"` is count 3, token `"dd"`);
//! - **rejected**: a token visual mode does not accept; it is reported and
//!   discarded while the remainder is kept.
//!
//! Grammar, in order:
//!
//! 1. A leading `0` is the line-start command, never a count.
//! 2. A run of digits is the count. Digits alone are incomplete.
//! 3. A *prefix* character takes exactly one more char as part of the token
//!    (`dd`, `gg`, `fx`, `"a`, `>>`). A prefix at the end is incomplete.
//! 4. Any other char is a one-char token.
//!
//! Which chars are prefixes depends on the mode. In visual mode one-char
//! tokens are further restricted to a whitelist.

use tracing::trace;

use crate::mode::{Mode, VisualKind};

/// Prefixes in Normal mode.
const NORMAL_PREFIXES: &str = "cdfFgmrtTyzZ@'`\"<>";

/// Prefixes taking a literal argument char, valid in every visual mode.
const ARG_PREFIXES: &str = "fFrtT\"";

/// One-char commands accepted in visual mode.
const VISUAL_COMMANDS: &str = "bcdehHjJklLnNpPGywx$^0 \r\u{8}%~<>vV";

/// What the pending input amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed<'a> {
    /// More keys are needed.
    Incomplete,
    /// A complete command token.
    Command {
        count: Option<usize>,
        token: &'a str,
        rest: &'a str,
    },
    /// A token that is not accepted in the current mode.
    Rejected { token: &'a str, rest: &'a str },
}

/// True if `ch` takes an argument char in `mode`.
#[must_use]
pub fn is_prefix(ch: char, mode: Mode) -> bool {
    match mode {
        Mode::Normal | Mode::Insert => NORMAL_PREFIXES.contains(ch),
        Mode::Visual(VisualKind::Char) => "agi".contains(ch) || ARG_PREFIXES.contains(ch),
        Mode::Visual(VisualKind::Line) => ch == 'g' || ARG_PREFIXES.contains(ch),
    }
}

/// Parse the pending input for `mode`.
#[must_use]
pub fn parse(input: &str, mode: Mode) -> Parsed<'_> {
    let parsed = parse_inner(input, mode);
    trace!(?input, ?parsed, "parse");
    parsed
}

fn parse_inner(input: &str, mode: Mode) -> Parsed<'_> {
    if let Some(rest) = input.strip_prefix('0') {
        return Parsed::Command {
            count: None,
            token: &input[..1],
            rest,
        };
    }

    let digits = input.len() - input.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let count = (digits > 0).then(|| parse_count(&input[..digits]));
    let body = &input[digits..];

    let Some(first) = body.chars().next() else {
        return Parsed::Incomplete;
    };
    let mut token_len = first.len_utf8();

    if is_prefix(first, mode) {
        let Some(arg) = body[token_len..].chars().next() else {
            return Parsed::Incomplete;
        };
        token_len += arg.len_utf8();
    }

    let (token, rest) = body.split_at(token_len);

    if mode.is_visual() && token_len == first.len_utf8() && !VISUAL_COMMANDS.contains(first) {
        return Parsed::Rejected { token, rest };
    }

    Parsed::Command { count, token, rest }
}

/// Decimal count, saturating instead of overflowing.
fn parse_count(digits: &str) -> usize {
    digits
        .bytes()
        .map(|b| usize::from(b - b'0'))
        .fold(0usize, |acc, d| acc.saturating_mul(10).saturating_add(d))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
