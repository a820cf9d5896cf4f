//! Error types for key-path parsing.

use thiserror::Error;

/// Errors that can occur while parsing a key-path pattern.
///
/// Positions count characters from the start of the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YamlPathError {
    #[error("key-path is empty")]
    Empty,

    #[error("unexpected '{found}' at position {position}, expected {expected}")]
    UnexpectedChar {
        position: usize,
        found: char,
        expected: &'static str,
    },

    #[error("key-path ends early, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// Brackets hold a quoted key or `*`; list indices are not part of a
    /// key-path.
    #[error("unsupported bracket segment at position {position}")]
    UnsupportedBracket { position: usize },

    #[error("invalid escape in quoted key at position {position}")]
    InvalidEscape { position: usize },
}
