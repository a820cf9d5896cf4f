//! Editor-side view of an open document.

use std::path::{Path, PathBuf};

use lsp_types::Position;

use super::error::DocumentError;
use super::line_index::LineIndex;
use super::parser::parse_workflow;
use super::tree::Snapshot;

/// The live state of a document as the editor holds it.
///
/// `TextDocument` is what editor events carry: an identifier, a version that
/// increases with every edit, and the full current text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDocument {
    path: PathBuf,
    version: i32,
    text: String,
}

impl TextDocument {
    pub fn new(path: impl Into<PathBuf>, version: i32, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version,
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the full text and bumps the version.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.version += 1;
    }

    /// Converts a position in the current text to a character offset.
    pub fn offset_at(&self, position: Position) -> usize {
        LineIndex::new(&self.text).position_to_offset(position)
    }

    pub fn position_at(&self, offset: usize) -> Position {
        LineIndex::new(&self.text).offset_to_position(offset)
    }

    /// Parses the current text into a fresh snapshot.
    pub fn snapshot(&self) -> Result<Snapshot, DocumentError> {
        parse_workflow(&self.text)
    }
}
