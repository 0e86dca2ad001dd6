//! Cursor motions.
//!
//! Motions only move the cursor. In Visual mode the selection follows,
//! since it is always the span between the anchor and the cursor.

use crate::adapter::{Host, TextBuffer};
use crate::mode::VisualKind;
use crate::symbol::Symbol;
use crate::text_object::match_bracket;
use crate::word::{CharClass, classify};

use super::Engine;

impl<B: TextBuffer, H: Host> Engine<B, H> {
    pub(super) fn apply_motion(&mut self, symbol: Symbol, count: Option<usize>) {
        let target = self.motion_target(symbol, count);
        match symbol {
            Symbol::Down | Symbol::Up => {}
            Symbol::LineEnd => self.sticky_col = Some(usize::MAX),
            _ => self.sticky_col = None,
        }
        if let Some(target) = target {
            self.move_cursor(target);
        }
    }

    /// Where `symbol` moves the cursor. `None` leaves it in place.
    fn motion_target(&mut self, symbol: Symbol, count: Option<usize>) -> Option<usize> {
        let n = count.unwrap_or(1).max(1);
        let cursor = self.buffer.cursor();
        let pos = self.buffer.position(cursor);

        match symbol {
            // Within the line
            Symbol::Left => Some(cursor - pos.col.min(n)),
            Symbol::Right => Some(
                cursor
                    .saturating_add(n)
                    .min(self.line_last_char(pos.line))
                    .max(cursor),
            ),
            Symbol::LineStart => Some(self.buffer.line_to_char(pos.line)),
            Symbol::FirstNonBlank => Some(self.first_non_blank(pos.line)),
            Symbol::LineEnd => {
                let line = pos.line.saturating_add(n - 1).min(self.last_line());
                match self.selection {
                    Some(sel) if sel.kind == VisualKind::Char => Some(self.buffer.line_end(line)),
                    _ => Some(self.line_last_char(line)),
                }
            }
            Symbol::FindForward(ch) => self.find_in_line(cursor, ch, n, true),
            Symbol::FindBackward(ch) => self.find_in_line(cursor, ch, n, false),
            Symbol::TillForward(ch) => self.find_in_line(cursor, ch, n, true).map(|i| i - 1),
            Symbol::TillBackward(ch) => self.find_in_line(cursor, ch, n, false).map(|i| i + 1),

            // Across lines
            Symbol::Down | Symbol::Up => {
                let line = if symbol == Symbol::Down {
                    pos.line.saturating_add(n).min(self.last_line())
                } else {
                    pos.line.saturating_sub(n)
                };
                let col = *self.sticky_col.get_or_insert(pos.col);
                let start = self.buffer.line_to_char(line);
                Some(start.saturating_add(col).min(self.line_last_char(line)))
            }
            Symbol::Space => Some(self.wrap_right(cursor, n)),
            Symbol::Backspace => Some(self.wrap_left(cursor, n)),
            Symbol::Return => (pos.line < self.last_line()).then(|| {
                let line = pos.line.saturating_add(n).min(self.last_line());
                self.buffer.line_to_char(line)
            }),
            Symbol::WordForward => Some(self.repeat_hop(cursor, n, |buf, idx| {
                buf.next_word_start(idx)
            })),
            Symbol::WordBackward => Some(self.repeat_hop(cursor, n, |buf, idx| {
                buf.prev_word_start(idx)
            })),
            Symbol::WordEnd => Some(self.repeat_hop(cursor, n, word_end_forward)),

            // Whole document
            Symbol::LastLine => {
                let line = count.map_or(self.last_line(), |k| k.saturating_sub(1));
                Some(self.first_non_blank(line.min(self.last_line())))
            }
            Symbol::FirstLine => {
                let line = count.unwrap_or(1).saturating_sub(1);
                Some(self.first_non_blank(line.min(self.last_line())))
            }
            Symbol::ScreenTop | Symbol::ScreenMiddle | Symbol::ScreenBottom => {
                let line = self.screen_line(symbol, n);
                Some(self.first_non_blank(line))
            }
            Symbol::MatchBracket => match_bracket(&self.buffer, cursor),
            Symbol::CenterLine => {
                self.host.center_line(pos.line);
                None
            }
            Symbol::SearchNext => self.search.next(cursor, n, false),
            Symbol::SearchPrev => self.search.next(cursor, n, true),

            _ => None,
        }
    }

    /// Offset of the `n`th `ch` after (or before) `cursor` on its line.
    fn find_in_line(&self, cursor: usize, ch: char, n: usize, forward: bool) -> Option<usize> {
        let line = self.buffer.char_to_line(cursor);
        let start = self.buffer.line_to_char(line);
        let end = self.buffer.line_end(line);
        let is_hit = |&idx: &usize| self.buffer.char_at(idx) == Some(ch);
        if forward {
            (cursor + 1..end).filter(is_hit).nth(n - 1)
        } else {
            (start..cursor).rev().filter(is_hit).nth(n - 1)
        }
    }

    /// Right by `n` chars, continuing at the start of the next line.
    fn wrap_right(&self, mut idx: usize, n: usize) -> usize {
        for _ in 0..n {
            let line = self.buffer.char_to_line(idx);
            if idx < self.line_last_char(line) {
                idx += 1;
            } else if line < self.last_line() {
                idx = self.buffer.line_to_char(line + 1);
            } else {
                break;
            }
        }
        idx
    }

    /// Left by `n` chars, continuing at the end of the previous line.
    fn wrap_left(&self, mut idx: usize, n: usize) -> usize {
        for _ in 0..n {
            let line = self.buffer.char_to_line(idx);
            if idx > self.buffer.line_to_char(line) {
                idx -= 1;
            } else if line > 0 {
                idx = self.line_last_char(line - 1);
            } else {
                break;
            }
        }
        idx
    }

    /// Apply a word hop `n` times, stopping early once it stops moving.
    fn repeat_hop(&self, mut idx: usize, n: usize, hop: impl Fn(&B, usize) -> usize) -> usize {
        for _ in 0..n {
            let next = hop(&self.buffer, idx);
            if next == idx {
                break;
            }
            idx = next;
        }
        idx
    }

    /// Target line of `H`, `M` or `L` inside the host's viewport.
    fn screen_line(&self, symbol: Symbol, n: usize) -> usize {
        let last = self.last_line();
        let (top, bottom) = self.host.viewport().unwrap_or((0, last));
        let bottom = bottom.min(last);
        let top = top.min(bottom);
        match symbol {
            Symbol::ScreenTop => top.saturating_add(n - 1).min(bottom),
            Symbol::ScreenBottom => bottom.saturating_sub(n - 1).max(top),
            _ => top + (bottom - top) / 2,
        }
    }
}

/// Vim's `e`: the end of the current word, or of the next one when already
/// on a word end.
fn word_end_forward<B: TextBuffer>(buf: &B, idx: usize) -> usize {
    let here = buf.char_at(idx).map(classify);
    let next = buf.char_at(idx + 1).map(classify);
    let at_end = here.is_some_and(CharClass::is_token) && here != next;
    if at_end && idx + 1 < buf.len_chars() {
        buf.word_end(idx + 1)
    } else {
        buf.word_end(idx)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use crate::adapter::{RecordingHost, TextBuffer};
    use crate::engine::tests::{DOC, cursor_at, engine, engine_at};
    use crate::position::Position;

    // ── Line motions ──────────────────────────────────────────────────────

    #[test]
    fn h_and_l_stop_at_line_bounds() {
        let mut e = engine_at(DOC, 1, 2);
        e.feed_keys("10l");
        assert_eq!(cursor_at(&e), Position::new(1, 5));
        e.feed_keys("10h");
        assert_eq!(cursor_at(&e), Position::new(1, 0));
    }

    #[test]
    fn dollar_zero_and_caret() {
        let mut e = engine(DOC);
        e.feed_keys("$");
        assert_eq!(cursor_at(&e), Position::new(0, 5));
        e.feed_keys("0");
        assert_eq!(cursor_at(&e), Position::new(0, 0));
        e.feed_keys("^");
        assert_eq!(cursor_at(&e), Position::new(0, 3));
    }

    #[test]
    fn dollar_with_count_reaches_later_line() {
        let mut e = engine(DOC);
        e.feed_keys("2$");
        assert_eq!(cursor_at(&e), Position::new(1, 5));
    }

    #[test]
    fn find_and_till() {
        let mut e = engine("hello world");
        e.feed_keys("fw");
        assert_eq!(e.buffer().cursor(), 6);
        e.feed_keys("Fo");
        assert_eq!(e.buffer().cursor(), 4);
        e.feed_keys("to");
        assert_eq!(e.buffer().cursor(), 6);
        e.feed_keys("0To");
        assert_eq!(e.buffer().cursor(), 0);
    }

    #[test]
    fn find_with_count_and_miss() {
        let mut e = engine("abracadabra");
        e.feed_keys("3fa");
        assert_eq!(e.buffer().cursor(), 7);
        e.feed_keys("fz");
        assert_eq!(e.buffer().cursor(), 7);
    }

    #[test]
    fn find_stays_on_the_line() {
        let mut e = engine("ab\nab");
        e.feed_keys("fa");
        assert_eq!(e.buffer().cursor(), 0);
    }

    // ── Vertical motions ──────────────────────────────────────────────────

    #[test]
    fn j_and_k_with_counts() {
        let mut e = engine(DOC);
        e.feed_keys("3j");
        assert_eq!(cursor_at(&e), Position::new(3, 0));
        e.feed_keys("2k");
        assert_eq!(cursor_at(&e), Position::new(1, 0));
        e.feed_keys("9j");
        assert_eq!(cursor_at(&e), Position::new(4, 0));
    }

    #[test]
    fn vertical_moves_keep_the_column() {
        let mut e = engine("long line\nab\nlong line");
        e.feed_keys("6l");
        e.feed_keys("j");
        assert_eq!(cursor_at(&e), Position::new(1, 1));
        e.feed_keys("j");
        assert_eq!(cursor_at(&e), Position::new(2, 6));
    }

    #[test]
    fn dollar_column_sticks_to_line_ends() {
        let mut e = engine("ab\nlonger\nxyz");
        e.feed_keys("$j");
        assert_eq!(cursor_at(&e), Position::new(1, 5));
        e.feed_keys("j");
        assert_eq!(cursor_at(&e), Position::new(2, 2));
    }

    #[test]
    fn space_and_backspace_wrap() {
        let mut e = engine("ab\ncd");
        e.feed_keys("   ");
        assert_eq!(cursor_at(&e), Position::new(1, 1));
        e.feed_keys("<BS><BS>");
        assert_eq!(cursor_at(&e), Position::new(0, 1));
    }

    #[test]
    fn return_goes_to_column_zero_below() {
        let mut e = engine_at(DOC, 0, 4);
        e.feed_keys("<CR>");
        assert_eq!(cursor_at(&e), Position::new(1, 0));
        e.feed_keys("2<CR>");
        assert_eq!(cursor_at(&e), Position::new(3, 0));
    }

    #[test]
    fn arrow_keys_move_like_hjkl() {
        let mut e = engine(DOC);
        e.feed_keys("<Down><Right><Right><Up><Left>");
        assert_eq!(cursor_at(&e), Position::new(0, 1));
    }

    // ── Words ─────────────────────────────────────────────────────────────

    #[test]
    fn w_b_e() {
        let mut e = engine("foo bar.baz qux");
        e.feed_keys("w");
        assert_eq!(e.buffer().cursor(), 4);
        e.feed_keys("w");
        assert_eq!(e.buffer().cursor(), 7);
        e.feed_keys("b");
        assert_eq!(e.buffer().cursor(), 4);
        e.feed_keys("e");
        assert_eq!(e.buffer().cursor(), 6);
        e.feed_keys("e");
        assert_eq!(e.buffer().cursor(), 7);
        e.feed_keys("2e");
        assert_eq!(e.buffer().cursor(), 14);
    }

    #[test]
    fn w_crosses_lines() {
        let mut e = engine(DOC);
        e.feed_keys("w");
        assert_eq!(cursor_at(&e), Position::new(0, 3));
        e.feed_keys("w");
        assert_eq!(cursor_at(&e), Position::new(1, 0));
        e.feed_keys("3w");
        assert_eq!(cursor_at(&e), Position::new(2, 5));
    }

    #[test]
    fn w_at_end_stays_on_last_char() {
        let mut e = engine("one two");
        e.feed_keys("5w");
        assert_eq!(e.buffer().cursor(), 6);
    }

    // ── Document ──────────────────────────────────────────────────────────

    #[test]
    fn gg_and_g() {
        let mut e = engine_at(DOC, 2, 3);
        e.feed_keys("gg");
        assert_eq!(cursor_at(&e), Position::new(0, 3));
        e.feed_keys("G");
        assert_eq!(cursor_at(&e), Position::new(4, 0));
        e.feed_keys("2G");
        assert_eq!(cursor_at(&e), Position::new(1, 0));
        e.feed_keys("4gg");
        assert_eq!(cursor_at(&e), Position::new(3, 0));
        e.feed_keys("99G");
        assert_eq!(cursor_at(&e), Position::new(4, 0));
    }

    #[test]
    fn screen_lines_without_viewport_span_the_document() {
        let mut e = engine_at(DOC, 2, 0);
        e.feed_keys("H");
        assert_eq!(cursor_at(&e).line, 0);
        e.feed_keys("L");
        assert_eq!(cursor_at(&e).line, 4);
        e.feed_keys("M");
        assert_eq!(cursor_at(&e).line, 2);
        e.feed_keys("2L");
        assert_eq!(cursor_at(&e).line, 3);
    }

    #[test]
    fn screen_lines_use_the_viewport() {
        let host = RecordingHost {
            viewport: Some((1, 3)),
            ..RecordingHost::default()
        };
        let mut e = crate::engine::Engine::new(crate::buffer::Buffer::from_text(DOC), host);
        e.feed_keys("L");
        assert_eq!(cursor_at(&e).line, 3);
        e.feed_keys("H");
        assert_eq!(cursor_at(&e).line, 1);
        e.feed_keys("M");
        assert_eq!(cursor_at(&e).line, 2);
    }

    #[test]
    fn percent_jumps_between_brackets() {
        let mut e = engine("if (a[1]) {}");
        e.feed_keys("%");
        assert_eq!(e.buffer().cursor(), 8);
        e.feed_keys("%");
        assert_eq!(e.buffer().cursor(), 3);
    }

    #[test]
    fn zz_asks_the_host_to_center() {
        let mut e = engine_at(DOC, 3, 2);
        e.feed_keys("zz");
        assert_eq!(
            e.host_mut().take_actions(),
            vec![crate::adapter::HostAction::CenterLine(3)]
        );
        assert_eq!(cursor_at(&e), Position::new(3, 2));
    }

    // ── Counts ────────────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn count_equals_repetition(
            key in prop::sample::select(vec!['h', 'j', 'k', 'l', 'w', 'b', 'e']),
            count in 1usize..8,
            line in 0usize..5,
            col in 0usize..7,
        ) {
            let mut counted = engine_at(DOC, line, col);
            counted.feed_keys(&format!("{count}{key}"));

            let mut repeated = engine_at(DOC, line, col);
            repeated.feed_keys(&key.to_string().repeat(count));

            prop_assert_eq!(counted.buffer().cursor(), repeated.buffer().cursor());
        }
    }
}
