//! Error types for loading YAML snapshots.

use thiserror::Error;
use yaml_rust2::ScanError;

/// Errors that can occur while turning document text into a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The YAML scanner or parser rejected the text.
    #[error("{message} at line {line} column {column}")]
    Syntax {
        message: String,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// Character offset of the error
        offset: usize,
    },
}

impl DocumentError {
    /// Character offset at which the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            DocumentError::Syntax { offset, .. } => *offset,
        }
    }
}

impl DocumentError {
    /// Wraps a scanner error. `offset` is the character offset of the
    /// marker; the marker index itself counts bytes inside block scalars.
    pub(crate) fn from_scan(err: &ScanError, offset: usize) -> Self {
        let marker = err.marker();
        DocumentError::Syntax {
            message: err.info().to_string(),
            line: marker.line(),
            column: marker.col() + 1,
            offset,
        }
    }
}
