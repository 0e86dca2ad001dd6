//! Colon commands: the `:` line.
//!
//! After `:` the host collects a line of text; on Enter the engine parses it
//! into a [`ColonCommand`] and executes it.
//!
//! # Supported commands
//!
//! | Command      | Action                                    |
//! |--------------|-------------------------------------------|
//! | `:w`         | Save the current file                     |
//! | `:q`         | Close the current file                    |
//! | `:wq`        | Save, then close                          |
//! | `:n`         | Create a new file                         |
//! | `:e`         | Reload the current file from disk         |
//! | `:e .`       | Open the host's file dialog               |
//! | `:e <path>`  | Not supported, reported as an error       |
//! | `:N`         | Go to line N (1-indexed)                  |
//! | `:set ...`   | Change or query options                   |
//!
//! The first whitespace-separated word is the command name and the rest is
//! its argument string. Arguments to `:w`, `:q`, `:wq` and `:n` are ignored.

use std::path::PathBuf;

use crate::options::{SetDirective, parse_set};

/// What `:e` was asked to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    /// `:e`: revert to the file on disk.
    Reload,
    /// `:e .`: let the user pick a file.
    Dialog,
    /// `:e <path>`.
    Path(PathBuf),
}

/// A parsed colon command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColonCommand {
    /// Blank input; does nothing.
    Empty,
    Write,
    Quit,
    WriteQuit,
    New,
    Edit(EditTarget),
    /// `:N`: 1-indexed line number.
    GotoLine(usize),
    Set(Vec<SetDirective>),
    /// Unrecognized command name.
    Unknown(String),
}

impl ColonCommand {
    /// Parse the text typed after `:`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }

        let (name, arg) = trimmed
            .split_once(char::is_whitespace)
            .map_or((trimmed, ""), |(name, arg)| (name, arg.trim()));

        if name.bytes().all(|b| b.is_ascii_digit()) {
            return Self::GotoLine(name.parse::<usize>().unwrap_or(usize::MAX));
        }

        match name {
            "w" => Self::Write,
            "q" => Self::Quit,
            "wq" => Self::WriteQuit,
            "n" => Self::New,
            "e" => Self::Edit(match arg {
                "" => EditTarget::Reload,
                "." => EditTarget::Dialog,
                path => EditTarget::Path(PathBuf::from(path)),
            }),
            "set" | "se" => Self::Set(parse_set(arg)),
            _ => Self::Unknown(name.to_string()),
        }
    }
}
