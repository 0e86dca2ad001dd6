//! # vimterp-core: Vim-style modal command interpreter
//!
//! This crate turns a stream of keystrokes into Vim editing commands applied
//! to a text buffer supplied by the host:
//!
//! - **[`key`]**: `KeyEvent` / `KeyCode` / `Modifiers` and key-notation parsing
//! - **[`parser`]**: pending-input parser: count, command token, remainder
//! - **[`symbol`]**: canonical command symbols the engine dispatches on
//! - **[`engine`]**: the mode state machine and command execution
//! - **[`register`]**: named, numbered, and unnamed copy/paste slots
//! - **[`search`]**: regex match list with cyclic `n` / `N` navigation
//! - **[`text_object`]**: delimiter text objects and `%` bracket matching
//! - **[`command`]**: `:`-prefixed line commands
//! - **[`adapter`]**: the `TextBuffer` and `Host` collaborator traits
//! - **[`buffer`]**: a rope-backed `TextBuffer` with undo history
//!
//! The engine never panics on user input and never returns errors to the
//! host: every problem is logged through `tracing` and reported through
//! [`adapter::Host::report`].

pub mod adapter;
pub mod buffer;
pub mod clipboard;
pub mod command;
pub mod engine;
pub mod error;
pub mod history;
pub mod key;
pub mod mode;
pub mod options;
pub mod parser;
pub mod position;
pub mod register;
pub mod search;
pub mod symbol;
pub mod text_object;
pub mod word;

pub use adapter::{Host, Layer, TextBuffer};
pub use buffer::Buffer;
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use mode::{Mode, VisualKind};
