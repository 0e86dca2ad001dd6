//! The interpreter engine.
//!
//! [`Engine`] owns the mode state machine. The host feeds it one key at a
//! time; in Normal and Visual mode the key is appended to the pending input,
//! which is parsed after every key and dispatched as soon as it forms a
//! complete command. Insert mode and the `:` / `/` / `?` line bypass the
//! parser.
//!
//! The engine edits through the [`TextBuffer`] it owns and asks the
//! [`Host`] for everything outside the text (files, tabs, clipboard,
//! viewport). It never panics on user input and never returns an error from
//! a key: problems are logged and handed to [`Host::report`].
//!
//! The dispatch is split by concern:
//!
//! - `motion`: cursor movement, shared by Normal and Visual mode
//! - `operator`: Normal-mode edits, registers, paste
//! - `visual`: the selection and the operators that act on it

mod motion;
mod operator;
mod visual;

use std::ops::Range;

use tracing::{debug, warn};

use crate::adapter::{Host, Layer, TextBuffer};
use crate::clipboard::ClipboardSync;
use crate::command::{ColonCommand, EditTarget};
use crate::error::EngineError;
use crate::key::{KeyCode, KeyEvent, Modifiers, parse_keys};
use crate::mode::Mode;
use crate::options::Options;
use crate::parser::{self, Parsed};
use crate::position::Position;
use crate::register::{RegisterKind, RegisterName, RegisterStore};
use crate::search::{SearchController, SearchDirection};
use crate::symbol::{Symbol, canonical};

pub use visual::Selection;

// ─── Line input ─────────────────────────────────────────────────────────────

/// Text being typed after `:`, `/` or `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineInput {
    prefix: char,
    text: String,
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// The modal command interpreter.
///
/// Generic over the buffer it edits and the host it reports to. Headless
/// users pass `()` as the host.
pub struct Engine<B: TextBuffer, H: Host = ()> {
    buffer: B,
    host: H,

    /// True between entering Insert mode and the `Esc` that leaves it.
    inserting: bool,

    /// Visual selection. `Some` exactly while in Visual mode.
    selection: Option<Selection>,

    /// Keys typed in Normal/Visual mode that do not form a command yet.
    pending: String,

    /// Active `:` / `/` / `?` line, if any.
    line_input: Option<LineInput>,

    registers: RegisterStore,
    search: SearchController,
    clipboard: ClipboardSync,
    options: Options,

    /// Column `j` / `k` aim for. `usize::MAX` after `$` keeps the cursor at
    /// line ends. Reset by every horizontal move.
    sticky_col: Option<usize>,
}

impl<B: TextBuffer> Engine<B> {
    /// An engine with no host.
    #[must_use]
    pub fn headless(buffer: B) -> Self {
        Self::new(buffer, ())
    }
}

impl<B: TextBuffer, H: Host> Engine<B, H> {
    /// Create an engine with default options, in Normal mode.
    #[must_use]
    pub fn new(buffer: B, host: H) -> Self {
        Self::with_options(buffer, host, Options::default())
    }

    #[must_use]
    pub fn with_options(buffer: B, host: H, options: Options) -> Self {
        Self {
            buffer,
            host,
            inserting: false,
            selection: None,
            pending: String::new(),
            line_input: None,
            registers: RegisterStore::new(),
            search: SearchController::new(),
            clipboard: ClipboardSync::new(),
            options,
            sticky_col: None,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// The current mode. Derived from the insert flag and the selection, so
    /// Visual mode and a selection always go together.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self.selection {
            Some(sel) => Mode::Visual(sel.kind),
            None if self.inserting => Mode::Insert,
            None => Mode::Normal,
        }
    }

    #[must_use]
    pub const fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Keys typed so far that do not form a command yet.
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// The active line prompt (`:`, `/` or `?`) and its text.
    #[must_use]
    pub fn line_input(&self) -> Option<(char, &str)> {
        self.line_input
            .as_ref()
            .map(|input| (input.prefix, input.text.as_str()))
    }

    #[must_use]
    pub const fn buffer(&self) -> &B {
        &self.buffer
    }

    pub const fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub const fn registers(&self) -> &RegisterStore {
        &self.registers
    }

    #[must_use]
    pub const fn search(&self) -> &SearchController {
        &self.search
    }

    /// Give back the buffer and host.
    pub fn into_parts(self) -> (B, H) {
        (self.buffer, self.host)
    }

    // -- Key input ----------------------------------------------------------

    /// Process one keystroke.
    pub fn feed_key(&mut self, key: KeyEvent) {
        if self.inserting {
            self.insert_key(key);
        } else if self.line_input.is_some() {
            self.line_input_key(key);
        } else {
            self.command_key(key);
        }
        self.publish_cursor();
        self.publish_selection();
    }

    /// Process a key sequence in Vim notation, e.g. `"3dd"` or `"cwfoo<Esc>"`.
    pub fn feed_keys(&mut self, notation: &str) {
        for key in parse_keys(notation) {
            self.feed_key(key);
        }
    }

    fn command_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Escape {
            self.pending.clear();
            if self.selection.is_some() {
                self.exit_visual();
            }
            return;
        }
        if key.is_ctrl('v') {
            self.pending.clear();
            self.report(EngineError::Unsupported("block visual mode".into()));
            return;
        }

        let ch = match (key.code, key.typed_char()) {
            (_, Some(ch)) => ch,
            (code, None) if self.pending.is_empty() && key.modifiers == Modifiers::empty() => {
                match code {
                    KeyCode::Left => 'h',
                    KeyCode::Down => 'j',
                    KeyCode::Up => 'k',
                    KeyCode::Right => 'l',
                    KeyCode::Home => '0',
                    KeyCode::End => '$',
                    KeyCode::Delete => 'x',
                    _ => return self.report(EngineError::UnknownKey(describe(key))),
                }
            }
            _ => {
                self.pending.clear();
                return self.report(EngineError::UnknownKey(describe(key)));
            }
        };

        if self.pending.is_empty() && matches!(ch, ':' | '/' | '?') {
            self.line_input = Some(LineInput {
                prefix: ch,
                text: String::new(),
            });
            return;
        }

        self.pending.push(ch);
        self.drain_pending();
    }

    /// Dispatch every complete command in the pending input.
    fn drain_pending(&mut self) {
        while !self.pending.is_empty() {
            let input = std::mem::take(&mut self.pending);
            let rest = match parser::parse(&input, self.mode()) {
                Parsed::Incomplete => {
                    self.pending.push_str(&input);
                    return;
                }
                Parsed::Rejected { token, rest } => {
                    self.report(EngineError::UnknownKey(canonical(token)));
                    rest
                }
                Parsed::Command { count, token, rest } => {
                    match Symbol::resolve(token) {
                        Some(symbol) => self.execute(count, symbol),
                        None => self.report(EngineError::UnknownKey(canonical(token))),
                    }
                    rest
                }
            };

            if self.inserting {
                // Whatever followed the insert command is typed text.
                let typed = rest.to_string();
                self.insert_text(&typed);
                return;
            }
            self.pending = rest.to_string();
        }
    }

    fn line_input_key(&mut self, key: KeyEvent) {
        let Some(input) = self.line_input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Escape => {
                self.line_input = None;
                if self.selection.is_some() {
                    self.exit_visual();
                }
            }
            KeyCode::Enter => {
                let Some(LineInput { prefix, text }) = self.line_input.take() else {
                    return;
                };
                match prefix {
                    ':' => self.execute_colon_command(&text),
                    '?' => self.execute_search(&text, true),
                    _ => self.execute_search(&text, false),
                }
            }
            KeyCode::Backspace => {
                if input.text.pop().is_none() {
                    self.line_input = None;
                }
            }
            _ => {
                if let Some(ch) = key.typed_char() {
                    input.text.push(ch);
                }
            }
        }
    }

    fn insert_key(&mut self, key: KeyEvent) {
        let cursor = self.buffer.cursor();
        let pos = self.buffer.position(cursor);
        match key.code {
            KeyCode::Escape => self.leave_insert(),
            KeyCode::Enter => self.insert_text("\n"),
            KeyCode::Backspace => {
                if cursor > 0 {
                    self.buffer.delete(cursor - 1..cursor);
                    self.buffer.set_cursor(cursor - 1);
                }
            }
            KeyCode::Delete => self.buffer.delete(cursor..cursor + 1),
            KeyCode::Left => self.buffer.set_cursor(cursor - usize::from(pos.col > 0)),
            KeyCode::Right => {
                let end = self.buffer.line_end(pos.line);
                self.buffer.set_cursor((cursor + 1).min(end));
            }
            KeyCode::Up | KeyCode::Down => {
                let line = if key.code == KeyCode::Up {
                    pos.line.saturating_sub(1)
                } else {
                    pos.line + 1
                };
                let target = self.buffer.offset(Position::new(line, pos.col));
                self.buffer.set_cursor(target);
            }
            KeyCode::Home => self.buffer.set_cursor(self.buffer.line_to_char(pos.line)),
            KeyCode::End => self.buffer.set_cursor(self.buffer.line_end(pos.line)),
            KeyCode::Tab | KeyCode::Char(_) => match key.typed_char() {
                Some(ch) => {
                    let mut utf8 = [0; 4];
                    self.insert_text(ch.encode_utf8(&mut utf8));
                }
                None => self.report(EngineError::UnknownKey(describe(key))),
            },
        }
    }

    /// Type `text` at the cursor, leaving the cursor after it.
    fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let cursor = self.buffer.cursor();
        self.buffer.insert(cursor, text);
        self.buffer.set_cursor(cursor + text.chars().count());
    }

    // -- Mode transitions ---------------------------------------------------

    /// Enter Insert mode at the cursor. The whole insert session is one undo
    /// step.
    fn enter_insert(&mut self) {
        if self.selection.take().is_some() {
            self.buffer.decorate(Layer::Visual, &[]);
        }
        self.pending.clear();
        self.buffer.begin_edit();
        self.inserting = true;
        self.sticky_col = None;
        self.mode_changed();
    }

    fn leave_insert(&mut self) {
        self.buffer.end_edit();
        self.inserting = false;
        let cursor = self.buffer.cursor();
        if self.buffer.position(cursor).col > 0 {
            self.buffer.set_cursor(cursor - 1);
        }
        self.mode_changed();
    }

    fn mode_changed(&mut self) {
        let mode = self.mode();
        debug!(%mode, "mode changed");
        self.host.mode_changed(mode);
    }

    // -- Dispatch -----------------------------------------------------------

    fn execute(&mut self, count: Option<usize>, symbol: Symbol) {
        debug!(?count, %symbol, mode = %self.mode(), "execute");
        if symbol.is_motion() {
            self.apply_motion(symbol, count);
            return;
        }
        if self.selection.is_some() {
            self.execute_visual(count, symbol);
        } else {
            self.execute_normal(count, symbol);
        }
    }

    /// Run a `:` command line.
    pub fn execute_colon_command(&mut self, input: &str) {
        let command = ColonCommand::parse(input);
        debug!(?command, "colon command");
        match command {
            ColonCommand::Empty => {}
            ColonCommand::Write => self.host.save(),
            ColonCommand::Quit => self.host.close(),
            ColonCommand::WriteQuit => {
                self.host.save();
                self.host.close();
            }
            ColonCommand::New => self.host.new_file(),
            ColonCommand::Edit(EditTarget::Reload) => self.host.reload(),
            ColonCommand::Edit(EditTarget::Dialog) => self.host.open_dialog(),
            ColonCommand::Edit(EditTarget::Path(path)) => {
                self.report(EngineError::Unsupported(format!(":e {}", path.display())));
            }
            ColonCommand::GotoLine(line) => {
                let last = self.last_line();
                let target = self.first_non_blank(line.saturating_sub(1).min(last));
                self.move_cursor(target);
            }
            ColonCommand::Set(directives) => {
                for directive in &directives {
                    match self.options.apply(directive) {
                        Ok(Some(text)) => self.host.message(&text),
                        Ok(None) => {}
                        Err(err) => self.report(err),
                    }
                }
                self.publish_search();
            }
            ColonCommand::Unknown(name) => self.report(EngineError::UnknownCommand(name)),
        }
    }

    /// Search for `pattern`; `reverse` searches backwards (`?`). The cursor
    /// stays put until `n` or `N`. An invalid pattern is reported and the
    /// previous search stays in effect.
    pub fn execute_search(&mut self, pattern: &str, reverse: bool) {
        let direction = if reverse {
            SearchDirection::Backward
        } else {
            SearchDirection::Forward
        };
        let text = self.buffer.text();
        match self.search.search(&text, pattern, direction) {
            Ok(matches) => debug!(pattern, ?direction, hits = matches.len(), "search"),
            Err(err) => self.report(err),
        }
        self.publish_search();
    }

    /// The host's clipboard changed. The unnamed register takes `text` with
    /// the clipboard's kind tag: the kind of our own last write for an echo,
    /// character-wise for anything else.
    pub fn on_clipboard_changed(&mut self, text: &str) {
        let change = self.clipboard.observe(text);
        let kind = self.clipboard.kind();
        debug!(len = text.len(), ?change, ?kind, "clipboard changed");
        self.registers.load_unnamed(text, kind);
    }

    // -- Registers ----------------------------------------------------------

    fn select_register(&mut self, ch: char) {
        match RegisterName::from_char(ch) {
            Some(name) => self.registers.select(name),
            None => self.report(EngineError::UnknownKey(canonical(&format!("\"{ch}")))),
        }
    }

    /// Write a yank or cut to the selected register and mirror it on the
    /// system clipboard.
    fn store(&mut self, text: &str, kind: RegisterKind, cut: bool) {
        let discard = self.registers.selected() == RegisterName::BlackHole;
        self.registers.write(text, kind, cut);
        if discard || !self.options.clipboard {
            return;
        }
        self.clipboard.publish(text, kind);
        self.host.set_clipboard(text);
    }

    // -- Helpers ------------------------------------------------------------

    fn report(&mut self, err: EngineError) {
        warn!(%err, "command failed");
        self.host.report(&err);
    }

    fn line(&self) -> usize {
        self.buffer.char_to_line(self.buffer.cursor())
    }

    fn last_line(&self) -> usize {
        self.buffer.line_count().saturating_sub(1)
    }

    /// Offset of the last char of `line` (the line start when empty).
    fn line_last_char(&self, line: usize) -> usize {
        self.buffer
            .line_end(line)
            .saturating_sub(1)
            .max(self.buffer.line_to_char(line))
    }

    /// Offset just past the leading blanks of `line`.
    fn indent_end(&self, line: usize) -> usize {
        let start = self.buffer.line_to_char(line);
        let end = self.buffer.line_end(line);
        (start..end)
            .find(|&idx| !matches!(self.buffer.char_at(idx), Some(' ' | '\t')))
            .unwrap_or(end)
    }

    /// Offset of the first non-blank char of `line`; the last char when the
    /// line is all blanks.
    fn first_non_blank(&self, line: usize) -> usize {
        self.indent_end(line).min(self.line_last_char(line))
    }

    /// Move the cursor, clamped to where the current mode allows it.
    fn move_cursor(&mut self, idx: usize) {
        self.buffer.set_cursor(idx);
        self.clamp_cursor();
    }

    /// Keep the cursor on a char in Normal mode. Visual mode may also rest
    /// on a line break; Insert mode anywhere up to it.
    fn clamp_cursor(&mut self) {
        let mode = self.mode();
        if mode.cursor_past_end() {
            return;
        }
        let cursor = self.buffer.cursor();
        let line = self.buffer.char_to_line(cursor);
        let limit = match mode.visual_kind() {
            Some(_) => self.buffer.line_end(line),
            None => self.line_last_char(line),
        };
        if cursor > limit {
            self.buffer.set_cursor(limit);
        }
    }

    /// Text of lines `first..=last`, each terminated by a line break.
    fn lines_text(&self, first: usize, last: usize) -> String {
        let mut text = self
            .buffer
            .slice(self.buffer.line_to_char(first)..self.buffer.line_end(last));
        text.push('\n');
        text
    }

    // -- Decorations --------------------------------------------------------

    fn publish_cursor(&mut self) {
        let spans: Vec<Range<usize>> = if self.inserting {
            Vec::new()
        } else {
            let cursor = self.buffer.cursor();
            vec![cursor..cursor + 1]
        };
        self.buffer.decorate(Layer::Cursor, &spans);
    }

    fn publish_search(&mut self) {
        let spans = if self.options.hlsearch {
            self.search.spans()
        } else {
            Vec::new()
        };
        self.buffer.decorate(Layer::Search, &spans);
    }
}

/// A key spelled for an error message: `<C-x>`, `<A-Up>`, `x`.
fn describe(key: KeyEvent) -> String {
    let name = match key.code {
        KeyCode::Char(ch) => ch.to_string(),
        other => format!("{other:?}"),
    };
    let mut prefix = String::new();
    for (flag, tag) in [
        (Modifiers::CTRL, "C-"),
        (Modifiers::ALT, "A-"),
        (Modifiers::SHIFT, "S-"),
    ] {
        if key.modifiers.contains(flag) {
            prefix.push_str(tag);
        }
    }
    if prefix.is_empty() && name.chars().count() == 1 {
        name
    } else {
        format!("<{prefix}{name}>")
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
