//! Workflow file loading for the command line.
//!
//! The editor hands us live documents; the CLI has to read them itself,
//! either from disk or from stdin.

use crate::document::text::TextDocument;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Path used for documents read from stdin.
pub const STDIN_PATH: &str = "-";

/// Reads a workflow file from the filesystem.
///
/// The returned document has version 1. The text is not parsed here, so a
/// file with broken YAML still loads; parsing happens per query.
///
/// # Examples
///
/// ```no_run
/// use workflowlens::file::loader::load_workflow_file;
///
/// let doc = load_workflow_file(".github/workflows/ci.yml").unwrap();
/// let snapshot = doc.snapshot().unwrap();
/// ```
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or is not
/// valid UTF-8.
pub fn load_workflow_file<P: AsRef<Path>>(path: P) -> Result<TextDocument> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    tracing::debug!(path = %path.display(), chars = text.chars().count(), "loaded workflow");
    Ok(TextDocument::new(path, 1, text))
}

/// Reads a workflow document from stdin until EOF.
pub fn load_workflow_from_stdin() -> Result<TextDocument> {
    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;
    let text = String::from_utf8(buffer).context("Invalid UTF-8 in stdin")?;
    Ok(TextDocument::new(STDIN_PATH, 1, text))
}

/// Loads from stdin when `path` is `-`, from disk otherwise.
pub fn load_workflow<P: AsRef<Path>>(path: P) -> Result<TextDocument> {
    if path.as_ref() == Path::new(STDIN_PATH) {
        load_workflow_from_stdin()
    } else {
        load_workflow_file(path)
    }
}
