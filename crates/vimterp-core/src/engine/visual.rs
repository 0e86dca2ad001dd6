//! Visual mode: the selection and the operators that act on it.
//!
//! A selection is an anchor plus the cursor. Motions move only the cursor,
//! so the selected span is recomputed from both ends whenever it is needed.
//! Character-wise it runs from the smaller end to the larger one inclusive;
//! line-wise it covers every line either end touches.

use std::ops::Range;

use tracing::debug;

use crate::adapter::{Host, Layer, TextBuffer};
use crate::error::EngineError;
use crate::mode::VisualKind;
use crate::register::RegisterKind;
use crate::symbol::Symbol;
use crate::text_object::{ObjectScope, delimited};

use super::Engine;
use super::operator::{repeat_text, swap_case};

/// An active Visual-mode selection. The moving end is the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub kind: VisualKind,
}

/// What a selection covers.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Region {
    Chars(Range<usize>),
    /// First and last line, inclusive.
    Lines(usize, usize),
}

impl<B: TextBuffer, H: Host> Engine<B, H> {
    // -- Entering and leaving -----------------------------------------------

    /// `v` / `V`: start a selection, switch its kind, or leave Visual mode
    /// when the kind is already active.
    pub(super) fn enter_visual(&mut self, kind: VisualKind) {
        match self.selection {
            None => {
                self.selection = Some(Selection {
                    anchor: self.buffer.cursor(),
                    kind,
                });
            }
            Some(sel) if sel.kind == kind => return self.exit_visual(),
            Some(ref mut sel) => sel.kind = kind,
        }
        self.mode_changed();
    }

    pub(super) fn exit_visual(&mut self) {
        if self.selection.take().is_none() {
            return;
        }
        self.buffer.decorate(Layer::Visual, &[]);
        self.clamp_cursor();
        self.mode_changed();
    }

    fn region(&self) -> Option<Region> {
        let sel = self.selection?;
        let anchor = sel.anchor.min(self.buffer.len_chars());
        let cursor = self.buffer.cursor();
        let (lo, hi) = (anchor.min(cursor), anchor.max(cursor));
        Some(match sel.kind {
            VisualKind::Char => Region::Chars(lo..(hi + 1).min(self.buffer.len_chars())),
            VisualKind::Line => {
                Region::Lines(self.buffer.char_to_line(lo), self.buffer.char_to_line(hi))
            }
        })
    }

    /// Char span of a region. Line-wise regions stop before the final line
    /// break.
    fn region_span(&self, region: &Region) -> Range<usize> {
        match *region {
            Region::Chars(ref range) => range.clone(),
            Region::Lines(first, last) => {
                self.buffer.line_to_char(first)..self.buffer.line_end(last)
            }
        }
    }

    /// Lines a region touches.
    fn region_lines(&self, region: &Region) -> (usize, usize) {
        match *region {
            Region::Chars(ref range) => (
                self.buffer.char_to_line(range.start),
                self.buffer.char_to_line(range.end.saturating_sub(1).max(range.start)),
            ),
            Region::Lines(first, last) => (first, last),
        }
    }

    pub(super) fn publish_selection(&mut self) {
        let Some(region) = self.region() else {
            return;
        };
        let span = match region {
            Region::Chars(range) => range,
            Region::Lines(first, last) => {
                let end = (self.buffer.line_end(last) + 1).min(self.buffer.len_chars());
                self.buffer.line_to_char(first)..end
            }
        };
        self.buffer.decorate(Layer::Visual, &[span]);
    }

    // -- Dispatch -----------------------------------------------------------

    pub(super) fn execute_visual(&mut self, count: Option<usize>, symbol: Symbol) {
        let n = count.unwrap_or(1).max(1);
        let Some(region) = self.region() else {
            return;
        };

        match symbol {
            Symbol::Yank => self.visual_yank(&region),
            Symbol::Delete | Symbol::DeleteChar => self.visual_delete(region),
            Symbol::Change => self.visual_change(region),
            Symbol::Indent | Symbol::Outdent => {
                let (first, last) = self.region_lines(&region);
                self.exit_visual();
                self.shift_lines(first, last, n, symbol == Symbol::Indent);
            }
            Symbol::ToggleCase => {
                let span = self.region_span(&region);
                let text = swap_case(&self.buffer.slice(span.clone()));
                self.exit_visual();
                self.buffer.replace(span.clone(), &text);
                self.move_cursor(span.start);
            }
            Symbol::Replace(ch) => {
                let fill = if ch == '\r' { '\n' } else { ch };
                let span = self.region_span(&region);
                let text: String = self
                    .buffer
                    .slice(span.clone())
                    .chars()
                    .map(|c| if c == '\n' { c } else { fill })
                    .collect();
                self.exit_visual();
                self.buffer.replace(span.clone(), &text);
                self.move_cursor(span.start);
            }
            Symbol::Join => {
                let (first, last) = self.region_lines(&region);
                self.exit_visual();
                self.join_lines(first, last.max(first + 1));
            }
            Symbol::PasteAfter | Symbol::PasteBefore => self.visual_paste(region, n),
            Symbol::InnerObject(delim) => self.select_object(delim, ObjectScope::Inner),
            Symbol::AroundObject(delim) => self.select_object(delim, ObjectScope::Around),
            Symbol::VisualChar => self.enter_visual(VisualKind::Char),
            Symbol::VisualLine => self.enter_visual(VisualKind::Line),
            Symbol::SelectRegister(ch) => self.select_register(ch),
            _ => debug!(%symbol, "ignored in visual mode"),
        }
    }

    // -- Operators ----------------------------------------------------------

    fn visual_yank(&mut self, region: &Region) {
        let target = match *region {
            Region::Chars(ref range) => {
                let text = self.buffer.slice(range.clone());
                self.store(&text, RegisterKind::Char, false);
                range.start
            }
            Region::Lines(first, last) => {
                let text = self.lines_text(first, last);
                self.store(&text, RegisterKind::Line, false);
                self.buffer.line_to_char(first)
            }
        };
        self.exit_visual();
        self.move_cursor(target);
    }

    fn visual_delete(&mut self, region: Region) {
        self.exit_visual();
        match region {
            Region::Chars(range) => {
                let text = self.buffer.slice(range.clone());
                self.store(&text, RegisterKind::Char, true);
                self.buffer.delete(range.clone());
                self.move_cursor(range.start);
            }
            Region::Lines(first, last) => self.delete_lines(first, last),
        }
    }

    fn visual_change(&mut self, region: Region) {
        self.exit_visual();
        match region {
            Region::Chars(range) => {
                self.buffer.begin_edit();
                let text = self.buffer.slice(range.clone());
                self.store(&text, RegisterKind::Char, true);
                self.buffer.delete(range.clone());
                self.buffer.set_cursor(range.start);
                self.enter_insert();
                self.buffer.end_edit();
            }
            Region::Lines(first, last) => self.change_lines(first, last),
        }
    }

    /// `p` / `P` over a selection: the selection is cut and the register put
    /// in its place. The register is read before the cut overwrites it.
    fn visual_paste(&mut self, region: Region, n: usize) {
        let register = self.registers.read();
        self.exit_visual();
        let Some(register) = register.filter(|r| !r.is_empty()) else {
            return;
        };
        let Some(text) = repeat_text(register.content(), n) else {
            self.report(EngineError::Unsupported(format!("paste count {n}")));
            return;
        };
        let line_wise = register.kind() == RegisterKind::Line;

        self.buffer.begin_edit();
        match region {
            Region::Chars(range) => {
                let cut = self.buffer.slice(range.clone());
                self.store(&cut, RegisterKind::Char, true);
                self.buffer.delete(range.clone());
                let at = range.start;
                if line_wise {
                    self.buffer.insert(at, &format!("\n{text}"));
                    self.buffer.set_cursor(self.first_non_blank(self.buffer.char_to_line(at) + 1));
                } else {
                    self.buffer.insert(at, &text);
                    let target = if text.contains('\n') {
                        at
                    } else {
                        at + text.chars().count() - 1
                    };
                    self.move_cursor(target);
                }
            }
            Region::Lines(first, last) => {
                let cut = self.lines_text(first, last);
                self.store(&cut, RegisterKind::Line, true);
                self.remove_lines(first, last);
                if self.buffer.is_empty() {
                    self.buffer.insert(0, text.strip_suffix('\n').unwrap_or(&text));
                } else {
                    self.put_lines(first, &text);
                }
                self.buffer.set_cursor(self.first_non_blank(first.min(self.last_line())));
            }
        }
        self.buffer.end_edit();
    }

    /// `i<delim>` / `a<delim>`: select a delimited text object. Leaves the
    /// selection alone when there is none.
    fn select_object(&mut self, delim: char, scope: ObjectScope) {
        let cursor = self.buffer.cursor();
        let Some(range) = delimited(&self.buffer, cursor, delim, scope) else {
            debug!(%delim, ?scope, "no text object");
            return;
        };
        if let Some(sel) = self.selection.as_mut() {
            sel.anchor = range.start;
        }
        self.buffer.set_cursor(range.end - 1);
    }
}
