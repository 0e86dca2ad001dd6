//! Error types.
//!
//! None of these escape the engine's key entry points: the engine logs each
//! one and hands it to [`Host::report`](crate::adapter::Host::report). They
//! surface as `Result`s only from the lower-level building blocks: search
//! compilation and file I/O on [`Buffer`](crate::buffer::Buffer).

use std::io;

use thiserror::Error;

/// Problems raised while interpreting keys and line commands.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A key (or key pair) that maps to no command in the current mode.
    #[error("unknown key: {0:?}")]
    UnknownKey(String),

    /// A `:` command name that is not recognized.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A recognized command in a form that is not implemented.
    #[error("not supported: {0}")]
    Unsupported(String),

    /// A `:set` directive naming an option that does not exist, or an
    /// assignment that does not parse.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// The search pattern failed to compile.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        assert_eq!(
            EngineError::UnknownCommand("frob".into()).to_string(),
            "unknown command: frob"
        );
        assert_eq!(
            EngineError::UnknownKey("q".into()).to_string(),
            "unknown key: \"q\""
        );
    }

    #[test]
    fn regex_errors_convert() {
        let err = regex::Regex::new("(").map_err(EngineError::from).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPattern(_)));
        assert!(err.to_string().starts_with("invalid search pattern"));
    }
}
