//! Normal-mode edits: line and word operators, paste, join, indent, case.
//!
//! Every edit that removes or copies text goes through
//! [`Engine::store`](super::Engine) so the registers and the system
//! clipboard stay in sync. Compound edits are wrapped in
//! `begin_edit` / `end_edit` so `u` reverts them in one step.

use std::iter;

use tracing::debug;

use crate::adapter::{Host, TextBuffer};
use crate::error::EngineError;
use crate::mode::VisualKind;
use crate::register::RegisterKind;
use crate::symbol::Symbol;

use super::Engine;

/// Largest text a counted paste or shift may build, in bytes.
const MAX_REPEAT_BYTES: usize = 64 * 1024 * 1024;

impl<B: TextBuffer, H: Host> Engine<B, H> {
    pub(super) fn execute_normal(&mut self, count: Option<usize>, symbol: Symbol) {
        let n = count.unwrap_or(1).max(1);
        let line = self.line();
        let last = line.saturating_add(n - 1);

        match symbol {
            // Insert mode entries
            Symbol::Insert => self.enter_insert(),
            Symbol::InsertLineStart => {
                let target = self.indent_end(line);
                self.buffer.set_cursor(target);
                self.enter_insert();
            }
            Symbol::Append => {
                if self.buffer.line_len(line) > 0 {
                    self.buffer.set_cursor(self.buffer.cursor() + 1);
                }
                self.enter_insert();
            }
            Symbol::AppendLineEnd => {
                self.buffer.set_cursor(self.buffer.line_end(line));
                self.enter_insert();
            }
            Symbol::OpenBelow => self.open_line(true),
            Symbol::OpenAbove => self.open_line(false),

            // Line operators
            Symbol::DeleteLine => self.delete_lines(line, last),
            Symbol::ChangeLine => self.change_lines(line, last),
            Symbol::YankLine => {
                let last = last.min(self.last_line());
                let text = self.lines_text(line, last);
                self.store(&text, RegisterKind::Line, false);
            }
            Symbol::IndentLine => self.shift_lines(line, last, 1, true),
            Symbol::OutdentLine => self.shift_lines(line, last, 1, false),
            Symbol::Join => self.join_lines(line, line.saturating_add(n.max(2) - 1)),

            // Char and word operators
            Symbol::DeleteWord => self.delete_word(n),
            Symbol::ChangeWord => self.change_word(n),
            Symbol::YankWord => {
                let cursor = self.buffer.cursor();
                let end = self.word_span_end(n);
                if end > cursor {
                    let text = self.buffer.slice(cursor..end);
                    self.store(&text, RegisterKind::Char, false);
                }
            }
            Symbol::YankToEnd => {
                let cursor = self.buffer.cursor();
                let end = self.buffer.line_end(last.min(self.last_line()));
                if end > cursor {
                    let text = self.buffer.slice(cursor..end);
                    self.store(&text, RegisterKind::Char, false);
                }
            }
            Symbol::DeleteToEnd => {
                let cursor = self.buffer.cursor();
                let end = self.buffer.line_end(last.min(self.last_line()));
                self.cut_chars(cursor, end);
            }
            Symbol::DeleteChar => {
                let cursor = self.buffer.cursor();
                let end = cursor.saturating_add(n).min(self.buffer.line_end(line));
                self.cut_chars(cursor, end);
            }
            Symbol::Replace(ch) => self.replace_chars(ch, n),
            Symbol::ToggleCase => self.toggle_case(n),

            // Registers and history
            Symbol::PasteAfter => self.paste(n, true),
            Symbol::PasteBefore => self.paste(n, false),
            Symbol::SelectRegister(ch) => self.select_register(ch),
            Symbol::Undo => {
                for _ in 0..n {
                    if !self.buffer.undo() {
                        break;
                    }
                }
                self.clamp_cursor();
            }

            // Modes, files, tabs
            Symbol::VisualChar => self.enter_visual(VisualKind::Char),
            Symbol::VisualLine => self.enter_visual(VisualKind::Line),
            Symbol::SaveClose => {
                self.host.save();
                self.host.close();
            }
            Symbol::NextTab => match count {
                Some(tab) => self.host.goto_tab(tab.saturating_sub(1)),
                None => self.host.next_tab(),
            },
            Symbol::PrevTab => {
                for _ in 0..n {
                    self.host.prev_tab();
                }
            }

            _ => debug!(%symbol, "needs a selection"),
        }
    }

    // -- Lines --------------------------------------------------------------

    /// `dd`: cut lines `first..=last` line-wise.
    pub(super) fn delete_lines(&mut self, first: usize, last: usize) {
        let last = last.min(self.last_line());
        let text = self.lines_text(first, last);
        self.store(&text, RegisterKind::Line, true);
        self.remove_lines(first, last);
    }

    /// Remove lines `first..=last` with their line breaks and put the cursor
    /// on the first non-blank of the line that takes their place.
    pub(super) fn remove_lines(&mut self, first: usize, last: usize) {
        let range = if last < self.last_line() {
            self.buffer.line_to_char(first)..self.buffer.line_to_char(last + 1)
        } else if first > 0 {
            self.buffer.line_end(first - 1)..self.buffer.len_chars()
        } else {
            0..self.buffer.len_chars()
        };
        self.buffer.delete(range);
        let line = first.min(self.last_line());
        self.buffer.set_cursor(self.first_non_blank(line));
    }

    /// `cc`: cut lines `first..=last`, leave one empty line, insert there.
    pub(super) fn change_lines(&mut self, first: usize, last: usize) {
        let last = last.min(self.last_line());
        self.buffer.begin_edit();
        let text = self.lines_text(first, last);
        self.store(&text, RegisterKind::Line, true);
        let start = self.buffer.line_to_char(first);
        self.buffer.delete(start..self.buffer.line_end(last));
        self.buffer.set_cursor(start);
        self.enter_insert();
        self.buffer.end_edit();
    }

    /// Insert `text` as whole lines so that its first line becomes line
    /// `at`. `at` may be one past the last line. Returns the offset where
    /// the inserted lines start.
    pub(super) fn put_lines(&mut self, at: usize, text: &str) -> usize {
        let body = text.strip_suffix('\n').unwrap_or(text);
        if at < self.buffer.line_count() {
            let start = self.buffer.line_to_char(at);
            self.buffer.insert(start, &format!("{body}\n"));
            start
        } else {
            let end = self.buffer.len_chars();
            self.buffer.insert(end, &format!("\n{body}"));
            end + 1
        }
    }

    fn open_line(&mut self, below: bool) {
        let line = self.line();
        self.buffer.begin_edit();
        if below {
            let end = self.buffer.line_end(line);
            self.buffer.insert(end, "\n");
            self.buffer.set_cursor(end + 1);
        } else {
            let start = self.buffer.line_to_char(line);
            self.buffer.insert(start, "\n");
            self.buffer.set_cursor(start);
        }
        self.enter_insert();
        self.buffer.end_edit();
    }

    /// `J`: append lines `first+1..=last` to `first`, dropping their
    /// indentation and separating with one space. Empty lines vanish.
    pub(super) fn join_lines(&mut self, first: usize, last: usize) {
        let last = last.min(self.last_line());
        if first >= last {
            return;
        }

        let mut joined = self.buffer.line_text(first);
        let mut join_col = None;
        for line in first + 1..=last {
            let text = self.buffer.line_text(line);
            let fragment = text.trim_start();
            if fragment.is_empty() {
                continue;
            }
            join_col = Some(joined.chars().count());
            if !joined.is_empty() && !joined.ends_with([' ', '\t']) {
                joined.push(' ');
            }
            joined.push_str(fragment);
        }

        let start = self.buffer.line_to_char(first);
        let end = self.buffer.line_end(last);
        self.buffer.replace(start..end, &joined);
        let col = join_col.unwrap_or_else(|| joined.chars().count().saturating_sub(1));
        self.move_cursor(start + col);
    }

    /// `>>` / `<<`: shift lines `first..=last` by `levels` indent units.
    /// Empty lines are left alone.
    pub(super) fn shift_lines(&mut self, first: usize, last: usize, levels: usize, indent: bool) {
        let last = last.min(self.last_line());
        let width = self.options.shiftwidth.max(1);
        let prefix = if indent {
            let Some(prefix) = repeat_text(&self.options.indent_unit(), levels) else {
                self.report(EngineError::Unsupported(format!("shift by {levels} levels")));
                return;
            };
            prefix
        } else {
            String::new()
        };

        self.buffer.begin_edit();
        for line in first..=last {
            if self.buffer.line_len(line) == 0 {
                continue;
            }
            let start = self.buffer.line_to_char(line);
            if indent {
                self.buffer.insert(start, &prefix);
            } else {
                let text = self.buffer.line_text(line);
                let remove = outdent_len(&text, width.saturating_mul(levels), width);
                self.buffer.delete(start..start + remove);
            }
        }
        self.buffer.end_edit();
        self.buffer.set_cursor(self.first_non_blank(first));
    }

    // -- Chars and words ----------------------------------------------------

    /// Cut `start..end` char-wise, leaving the cursor at `start`.
    fn cut_chars(&mut self, start: usize, end: usize) {
        if end <= start {
            return;
        }
        let text = self.buffer.slice(start..end);
        self.store(&text, RegisterKind::Char, true);
        self.buffer.delete(start..end);
        self.move_cursor(start);
    }

    /// `dw`: cut up to the start of the `n`th next word, but never the line
    /// break in front of a word on a later line.
    fn delete_word(&mut self, n: usize) {
        let cursor = self.buffer.cursor();
        let end = self.word_motion_end(n);
        self.cut_chars(cursor, end);
    }

    /// Exclusive end of the `dw` span for `n` words.
    fn word_motion_end(&self, n: usize) -> usize {
        let cursor = self.buffer.cursor();
        let line = self.line();
        let mut end = cursor;
        for _ in 0..n {
            let next = self.buffer.next_word_start(end);
            if next == end {
                break;
            }
            end = next;
        }
        let end_line = self.buffer.char_to_line(end);
        if end_line > line && end == self.buffer.line_to_char(end_line) {
            end = self.buffer.line_end(end_line - 1).max(cursor);
        }
        end
    }

    /// Exclusive end of the `n` words `cw` and `yw` act on: through the end
    /// of the `n`th word, without the blanks after it.
    fn word_span_end(&self, n: usize) -> usize {
        let cursor = self.buffer.cursor();
        let mut end = self.buffer.word_end(cursor);
        for _ in 1..n {
            let next = self.buffer.word_end(end + 1);
            if next <= end {
                break;
            }
            end = next;
        }
        let limit = if n == 1 {
            self.buffer.line_end(self.line())
        } else {
            self.buffer.len_chars()
        };
        (end + 1).min(limit)
    }

    /// `cw`: cut the word span and insert in its place. On a blank `cw`
    /// works like `dw`, so only the blanks up to the next word change.
    fn change_word(&mut self, n: usize) {
        let cursor = self.buffer.cursor();
        let on_blank = self.buffer.char_at(cursor).is_some_and(|ch| ch == ' ' || ch == '\t');
        let end = if on_blank {
            self.word_motion_end(n)
        } else {
            self.word_span_end(n)
        };
        self.buffer.begin_edit();
        if end > cursor {
            let text = self.buffer.slice(cursor..end);
            self.store(&text, RegisterKind::Char, true);
            self.buffer.delete(cursor..end);
        }
        self.buffer.set_cursor(cursor);
        self.enter_insert();
        self.buffer.end_edit();
    }

    /// `r`: overwrite `n` chars with `ch`. Does nothing when fewer than `n`
    /// chars remain on the line. `r<CR>` splits the line instead.
    fn replace_chars(&mut self, ch: char, n: usize) {
        let cursor = self.buffer.cursor();
        let line_end = self.buffer.line_end(self.line());
        if line_end.saturating_sub(cursor) < n {
            return;
        }
        if ch == '\r' {
            self.buffer.replace(cursor..cursor + n, "\n");
            self.move_cursor(cursor + 1);
            return;
        }
        let text: String = iter::repeat_n(ch, n).collect();
        self.buffer.replace(cursor..cursor + n, &text);
        self.move_cursor(cursor + n - 1);
    }

    /// `~`: swap the case of `n` chars and step past them.
    fn toggle_case(&mut self, n: usize) {
        let cursor = self.buffer.cursor();
        let end = cursor
            .saturating_add(n)
            .min(self.buffer.line_end(self.line()));
        if end <= cursor {
            return;
        }
        let text = swap_case(&self.buffer.slice(cursor..end));
        self.buffer.replace(cursor..end, &text);
        self.move_cursor(cursor + text.chars().count());
    }

    // -- Paste --------------------------------------------------------------

    /// `p` / `P`: put the selected register `n` times after or before the
    /// cursor (below or above the line for line-wise text).
    fn paste(&mut self, n: usize, after: bool) {
        let Some(register) = self.registers.read() else {
            return;
        };
        if register.is_empty() {
            return;
        }
        let Some(text) = repeat_text(register.content(), n) else {
            self.report(EngineError::Unsupported(format!("paste count {n}")));
            return;
        };

        let line = self.line();
        match register.kind() {
            RegisterKind::Line => {
                let at = if after { line + 1 } else { line };
                let start = self.put_lines(at, &text);
                let line = self.buffer.char_to_line(start);
                self.buffer.set_cursor(self.first_non_blank(line));
            }
            RegisterKind::Char | RegisterKind::Block => {
                let cursor = self.buffer.cursor();
                let at = if after && self.buffer.line_len(line) > 0 {
                    cursor + 1
                } else {
                    cursor
                };
                self.buffer.insert(at, &text);
                let target = if text.contains('\n') {
                    at
                } else {
                    at + text.chars().count() - 1
                };
                self.move_cursor(target);
            }
        }
    }
}

/// `text` repeated `n` times, or `None` past [`MAX_REPEAT_BYTES`].
pub(super) fn repeat_text(text: &str, n: usize) -> Option<String> {
    let total = text.len().checked_mul(n)?;
    (total <= MAX_REPEAT_BYTES).then(|| text.repeat(n))
}

/// How many leading chars of `line` to drop to outdent by `amount` columns,
/// counting a tab as one full `width`.
fn outdent_len(line: &str, amount: usize, width: usize) -> usize {
    let mut removed = 0;
    let mut chars = 0;
    for ch in line.chars() {
        if removed >= amount {
            break;
        }
        match ch {
            ' ' => removed += 1,
            '\t' => removed += width,
            _ => break,
        }
        chars += 1;
    }
    chars
}

pub(super) fn swap_case(text: &str) -> String {
    text.chars()
        .flat_map(|ch| -> Box<dyn Iterator<Item = char>> {
            if ch.is_lowercase() {
                Box::new(ch.to_uppercase())
            } else if ch.is_uppercase() {
                Box::new(ch.to_lowercase())
            } else {
                Box::new(iter::once(ch))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{outdent_len, swap_case};
    use crate::adapter::{HostAction, TextBuffer};
    use crate::engine::tests::{DOC, cursor_at, engine, engine_at, unnamed};
    use crate::mode::Mode;
    use crate::position::Position;
    use crate::register::{RegisterKind, RegisterName};

    // ── Line operators ────────────────────────────────────────────────────

    #[test]
    fn dd_cuts_the_line() {
        let mut e = engine("line 1\nline 2\nline 3\nline 4");
        e.feed_keys("dd");
        assert_eq!(e.buffer().text(), "line 2\nline 3\nline 4");
        assert_eq!(unnamed(&e), Some(("line 1\n".into(), RegisterKind::Line)));
        let one = e.registers().peek(RegisterName::Numbered(1)).map(|r| r.content().to_string());
        assert_eq!(one.as_deref(), Some("line 1\n"));
        assert_eq!(e.host().clipboard(), Some("line 1\n"));
    }

    #[test]
    fn dd_with_count_and_on_last_line() {
        let mut e = engine_at(DOC, 1, 2);
        e.feed_keys("2dd");
        assert_eq!(e.buffer().text(), "   123\nline 3\nline 4");
        assert_eq!(cursor_at(&e), Position::new(1, 0));
        e.feed_keys("Gdd");
        assert_eq!(e.buffer().text(), "   123\nline 3");
        assert_eq!(cursor_at(&e), Position::new(1, 0));
    }

    #[test]
    fn dd_count_past_the_end_stops_at_last_line() {
        let mut e = engine_at(DOC, 3, 0);
        e.feed_keys("9dd");
        assert_eq!(e.buffer().text(), "   123\nline 1\nline 2");
        assert_eq!(cursor_at(&e), Position::new(2, 0));
    }

    #[test]
    fn only_newline_breaks_a_line() {
        let mut e = engine("a\x0cb\nc");
        e.feed_keys("yyp");
        assert_eq!(e.buffer().text(), "a\x0cb\na\x0cb\nc");
        assert_eq!(e.buffer().line_count(), 3);

        let mut e = engine("x\u{2028}y\nz");
        e.feed_keys("dd");
        assert_eq!(e.buffer().text(), "z");
        assert_eq!(unnamed(&e), Some(("x\u{2028}y\n".into(), RegisterKind::Line)));

        let mut e = engine("a\u{85}b\nc");
        e.feed_keys("J");
        assert_eq!(e.buffer().text(), "a\u{85}b c");
    }

    #[test]
    fn cc_keeps_an_empty_line_and_inserts() {
        let mut e = engine_at(DOC, 1, 3);
        e.feed_keys("ccnew<Esc>");
        assert_eq!(e.buffer().text(), "   123\nnew\nline 2\nline 3\nline 4");
        assert_eq!(unnamed(&e), Some(("line 1\n".into(), RegisterKind::Line)));
        assert_eq!(e.mode(), Mode::Normal);
    }

    #[test]
    fn yy_copies_without_moving() {
        let mut e = engine_at(DOC, 2, 3);
        e.feed_keys("2yy");
        assert_eq!(unnamed(&e), Some(("line 2\nline 3\n".into(), RegisterKind::Line)));
        assert_eq!(cursor_at(&e), Position::new(2, 3));
        assert_eq!(e.buffer().text(), DOC);
    }

    #[test]
    fn d_to_line_end() {
        let mut e = engine_at(DOC, 1, 2);
        e.feed_keys("D");
        assert_eq!(e.buffer().line_text(1), "li");
        assert_eq!(cursor_at(&e), Position::new(1, 1));
        assert_eq!(unnamed(&e), Some(("ne 1".into(), RegisterKind::Char)));
    }

    #[test]
    fn d_with_count_spans_lines() {
        let mut e = engine_at(DOC, 1, 2);
        e.feed_keys("2D");
        assert_eq!(e.buffer().text(), "   123\nli\nline 3\nline 4");
    }

    // ── Chars and words ───────────────────────────────────────────────────

    #[test]
    fn x_cuts_within_the_line() {
        let mut e = engine_at(DOC, 1, 3);
        e.feed_keys("x");
        assert_eq!(e.buffer().line_text(1), "lin 1");
        e.feed_keys("9x");
        assert_eq!(e.buffer().line_text(1), "lin");
        assert_eq!(cursor_at(&e), Position::new(1, 2));
        let small = e.registers().peek(RegisterName::SmallDelete).map(|r| r.content().to_string());
        assert_eq!(small.as_deref(), Some(" 1"));
    }

    #[test]
    fn dw_and_count() {
        let mut e = engine("one two three four");
        e.feed_keys("dw");
        assert_eq!(e.buffer().text(), "two three four");
        e.feed_keys("2dw");
        assert_eq!(e.buffer().text(), "four");
    }

    #[test]
    fn dw_on_last_word_keeps_the_line_break() {
        let mut e = engine_at("one two\nthree", 0, 4);
        e.feed_keys("dw");
        assert_eq!(e.buffer().text(), "one \nthree");
    }

    #[test]
    fn cw_changes_to_word_end() {
        let mut e = engine("one two three");
        e.feed_keys("cwONE<Esc>");
        assert_eq!(e.buffer().text(), "ONE two three");
        assert_eq!(e.buffer().cursor(), 2);
        e.feed_keys("w2cwX<Esc>");
        assert_eq!(e.buffer().text(), "ONE X");
    }

    #[test]
    fn cw_on_blanks_changes_only_the_blanks() {
        let mut e = engine_at("one   two", 0, 3);
        e.feed_keys("cwX<Esc>");
        assert_eq!(e.buffer().text(), "oneXtwo");
        assert_eq!(unnamed(&e), Some(("   ".into(), RegisterKind::Char)));

        let mut e = engine_at("one  \ntwo", 0, 3);
        e.feed_keys("cwX<Esc>");
        assert_eq!(e.buffer().text(), "oneX\ntwo");
    }

    #[test]
    fn yw_and_y_dollar() {
        let mut e = engine_at(DOC, 2, 0);
        e.feed_keys("yw");
        assert_eq!(unnamed(&e), Some(("line".into(), RegisterKind::Char)));
        e.feed_keys("2ly$");
        assert_eq!(unnamed(&e), Some(("ne 2".into(), RegisterKind::Char)));
        assert_eq!(cursor_at(&e), Position::new(2, 2));
    }

    #[test]
    fn replace_chars() {
        let mut e = engine("hello");
        e.feed_keys("3rx");
        assert_eq!(e.buffer().text(), "xxxlo");
        assert_eq!(e.buffer().cursor(), 2);
        e.feed_keys("9ry");
        assert_eq!(e.buffer().text(), "xxxlo");
    }

    #[test]
    fn replace_with_enter_splits() {
        let mut e = engine("ab cd");
        e.feed_keys("2lr<CR>");
        assert_eq!(e.buffer().text(), "ab\ncd");
        assert_eq!(cursor_at(&e), Position::new(1, 0));
    }

    #[test]
    fn tilde_swaps_and_advances() {
        let mut e = engine("Hello World");
        e.feed_keys("~");
        assert_eq!(e.buffer().text(), "hello World");
        assert_eq!(e.buffer().cursor(), 1);
        e.feed_keys("20~");
        assert_eq!(e.buffer().text(), "hELLO wORLD");
        assert_eq!(e.buffer().cursor(), 10);
    }

    // ── Join and shift ────────────────────────────────────────────────────

    #[test]
    fn join_lines() {
        let mut e = engine("a\n   b\n\nc");
        e.feed_keys("J");
        assert_eq!(e.buffer().text(), "a b\n\nc");
        assert_eq!(e.buffer().cursor(), 1);
        e.feed_keys("3J");
        assert_eq!(e.buffer().text(), "a b c");
    }

    #[test]
    fn join_on_last_line_does_nothing() {
        let mut e = engine_at(DOC, 4, 0);
        e.feed_keys("J");
        assert_eq!(e.buffer().text(), DOC);
    }

    #[test]
    fn indent_and_outdent() {
        let mut e = engine("a\n\nb");
        e.feed_keys("3>>");
        assert_eq!(e.buffer().text(), "    a\n\n    b");
        assert_eq!(e.buffer().cursor(), 4);
        e.feed_keys(">>");
        assert_eq!(e.buffer().line_text(0), "        a");
        e.feed_keys("<<<<<<");
        assert_eq!(e.buffer().line_text(0), "a");
    }

    #[test]
    fn shift_width_and_tabs_follow_options() {
        let mut e = engine(" \ta");
        e.execute_colon_command("set sw=2 noet");
        e.feed_keys("<<");
        assert_eq!(e.buffer().text(), "a");
        e.feed_keys(">>");
        assert_eq!(e.buffer().text(), "\ta");
    }

    #[test]
    fn outdent_counts_tabs_as_a_level() {
        assert_eq!(outdent_len("\t\tx", 4, 4), 1);
        assert_eq!(outdent_len("  x", 4, 4), 2);
        assert_eq!(outdent_len("      x", 4, 4), 4);
    }

    // ── Paste ─────────────────────────────────────────────────────────────

    #[test]
    fn line_paste_below_and_above() {
        let mut e = engine(DOC);
        e.feed_keys("jyyjp");
        assert_eq!(e.buffer().text(), "   123\nline 1\nline 2\nline 1\nline 3\nline 4");
        assert_eq!(cursor_at(&e), Position::new(3, 0));
        e.feed_keys("ggP");
        assert_eq!(e.buffer().line_text(0), "line 1");
        assert_eq!(cursor_at(&e), Position::new(0, 0));
    }

    #[test]
    fn line_paste_after_the_last_line() {
        let mut e = engine("a\nb");
        e.feed_keys("yyjp");
        assert_eq!(e.buffer().text(), "a\nb\na");
        assert_eq!(cursor_at(&e), Position::new(2, 0));
    }

    #[test]
    fn char_paste_after_and_before() {
        let mut e = engine("abc");
        e.feed_keys("vyp");
        assert_eq!(e.buffer().text(), "aabc");
        assert_eq!(e.buffer().cursor(), 1);
        e.feed_keys("3P");
        assert_eq!(e.buffer().text(), "aaaaabc");
        assert_eq!(e.buffer().cursor(), 3);
    }

    #[test]
    fn paste_into_empty_line_goes_at_the_cursor() {
        let mut e = engine("ab\n");
        e.feed_keys("vly");
        e.feed_keys("jp");
        assert_eq!(e.buffer().text(), "ab\nab");
    }

    #[test]
    fn paste_with_nothing_yanked_is_a_no_op() {
        let mut e = engine("abc");
        e.feed_keys("p");
        assert_eq!(e.buffer().text(), "abc");
    }

    #[test]
    fn oversized_paste_count_is_refused() {
        let mut e = engine("abc");
        e.feed_keys("yy1000000000000p");
        assert_eq!(e.buffer().text(), "abc");
        assert_eq!(e.host().errors, vec!["not supported: paste count 1000000000000".to_string()]);
        e.feed_keys("2p");
        assert_eq!(e.buffer().text(), "abc\nabc\nabc");
    }

    #[test]
    fn named_registers_and_black_hole() {
        let mut e = engine(DOC);
        e.feed_keys("j\"ayyj\"_dd");
        assert_eq!(e.buffer().line_text(2), "line 3");
        assert_eq!(unnamed(&e), Some(("line 1\n".into(), RegisterKind::Line)));
        e.feed_keys("yy\"ap");
        assert_eq!(e.buffer().line_text(3), "line 1");
    }

    #[test]
    fn invalid_register_name_is_reported() {
        let mut e = engine(DOC);
        e.feed_keys("\"!");
        assert_eq!(e.host().errors, vec!["unknown key: \"QUOTEEXCLAMATION\"".to_string()]);
    }

    // ── Undo ──────────────────────────────────────────────────────────────

    #[test]
    fn undo_reverts_one_command_at_a_time() {
        let mut e = engine(DOC);
        e.feed_keys("ddx");
        e.feed_keys("u");
        assert_eq!(e.buffer().text(), "line 1\nline 2\nline 3\nline 4");
        e.feed_keys("u");
        assert_eq!(e.buffer().text(), DOC);
        e.feed_keys("u");
        assert_eq!(e.buffer().text(), DOC);
    }

    #[test]
    fn insert_session_undoes_as_one_step() {
        let mut e = engine("x");
        e.feed_keys("cwabc<CR>def<Esc>");
        assert_eq!(e.buffer().text(), "abc\ndef");
        e.feed_keys("u");
        assert_eq!(e.buffer().text(), "x");
    }

    #[test]
    fn compound_edits_undo_together() {
        let mut e = engine("a\nb\nc");
        e.feed_keys("3>>3Ju");
        assert_eq!(e.buffer().text(), "    a\n    b\n    c");
        e.feed_keys("u");
        assert_eq!(e.buffer().text(), "a\nb\nc");
    }

    // ── Files and tabs ────────────────────────────────────────────────────

    #[test]
    fn zz_saves_then_closes() {
        let mut e = engine(DOC);
        e.feed_keys("ZZ");
        assert_eq!(e.host_mut().take_actions(), vec![HostAction::Save, HostAction::Close]);
    }

    #[test]
    fn tab_navigation() {
        let mut e = engine(DOC);
        e.feed_keys("gt3gt2gT");
        assert_eq!(
            e.host_mut().take_actions(),
            vec![
                HostAction::NextTab,
                HostAction::GotoTab(2),
                HostAction::PrevTab,
                HostAction::PrevTab,
            ]
        );
    }

    #[test]
    fn swap_case_handles_non_letters() {
        assert_eq!(swap_case("aB1 ß"), "Ab1 SS");
    }
}
