//! Linter findings as editor diagnostics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;
use lsp_types::{Diagnostic, DiagnosticSeverity};

use super::{ParseResult, RepositoryContextProvider, WorkflowLinter};
use crate::document::line_index::LineIndex;
use crate::document::node::Span;
use crate::document::text::TextDocument;

/// Diagnostics per document, in the order documents were first reported.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsCollection {
    entries: IndexMap<PathBuf, Vec<Diagnostic>>,
}

impl DiagnosticsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: &Path, diagnostics: Vec<Diagnostic>) {
        self.entries.insert(path.to_path_buf(), diagnostics);
    }

    pub fn get(&self, path: &Path) -> Option<&[Diagnostic]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Removes the entry for `path`, keeping the order of the rest.
    pub fn delete(&mut self, path: &Path) {
        self.entries.shift_remove(path);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Vec<Diagnostic>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Converts offset-based linter findings into error diagnostics.
pub fn to_lsp_diagnostics(
    index: &LineIndex,
    result: &ParseResult,
    source: &str,
) -> Vec<Diagnostic> {
    result
        .diagnostics
        .iter()
        .map(|d| {
            let [start, end] = d.pos;
            let span = Span::new(start.min(end), start.max(end));
            Diagnostic {
                range: index.range(span),
                severity: Some(DiagnosticSeverity::ERROR),
                source: Some(source.to_string()),
                message: d.message.clone(),
                ..Diagnostic::default()
            }
        })
        .collect()
}

/// Runs the linter on every text change and keeps the latest results.
///
/// Each run takes a per-document sequence number. Results are applied only
/// if no newer run for the same document started, and the document is still
/// open, by the time the linter answers.
pub struct DiagnosticsProvider {
    repositories: Rc<dyn RepositoryContextProvider>,
    linter: Rc<dyn WorkflowLinter>,
    source: String,
    collection: RefCell<DiagnosticsCollection>,
    sequences: RefCell<HashMap<PathBuf, u64>>,
}

impl DiagnosticsProvider {
    pub fn new(
        repositories: Rc<dyn RepositoryContextProvider>,
        linter: Rc<dyn WorkflowLinter>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            repositories,
            linter,
            source: source.into(),
            collection: RefCell::new(DiagnosticsCollection::new()),
            sequences: RefCell::new(HashMap::new()),
        }
    }

    /// Lints the document and stores the result.
    ///
    /// Returns the number of diagnostics applied, or `None` when nothing was
    /// applied (no repository, linter failure, or a newer run superseded
    /// this one).
    pub async fn on_change(&self, document: &TextDocument) -> Option<usize> {
        let path = document.path().to_path_buf();
        self.collection.borrow_mut().delete(&path);
        let seq = self.next_sequence(&path);

        let Some(ctx) = self.repositories.repository(&path).await else {
            tracing::debug!(path = %path.display(), "no repository context");
            return None;
        };

        let result = match self.linter.parse(&ctx, &path, document.text()).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "workflow linter failed");
                return None;
            }
        };

        if !self.is_latest(&path, seq) {
            tracing::debug!(path = %path.display(), seq, "discarding stale diagnostics");
            return None;
        }

        let index = LineIndex::new(document.text());
        let diagnostics = to_lsp_diagnostics(&index, &result, &self.source);
        let count = diagnostics.len();
        self.collection.borrow_mut().set(&path, diagnostics);
        Some(count)
    }

    /// Forgets the document. Runs still in flight for it are discarded.
    pub fn on_close(&self, path: &Path) {
        self.collection.borrow_mut().delete(path);
        self.sequences.borrow_mut().remove(path);
    }

    /// Returns a copy of the stored diagnostics for `path`.
    pub fn diagnostics(&self, path: &Path) -> Vec<Diagnostic> {
        self.collection
            .borrow()
            .get(path)
            .map(<[Diagnostic]>::to_vec)
            .unwrap_or_default()
    }

    pub fn collection(&self) -> std::cell::Ref<'_, DiagnosticsCollection> {
        self.collection.borrow()
    }

    fn next_sequence(&self, path: &Path) -> u64 {
        let mut sequences = self.sequences.borrow_mut();
        let seq = sequences.entry(path.to_path_buf()).or_insert(0);
        *seq += 1;
        *seq
    }

    fn is_latest(&self, path: &Path, seq: u64) -> bool {
        self.sequences.borrow().get(path) == Some(&seq)
    }
}
