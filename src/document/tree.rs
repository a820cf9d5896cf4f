//! Immutable parsed view of one version of a document.
//!
//! A [`Snapshot`] bundles the source text, its line table and the syntax tree
//! built from it. Snapshots are never updated in place: every query parses the
//! live text again, so no query can observe a stale tree.
//!
//! # Example
//!
//! ```
//! use workflowlens::document::parser::parse_workflow;
//! use workflowlens::yamlpath::Parser;
//!
//! let text = "jobs:\n  test:\n    steps:\n      - run: cargo test\n";
//! let snapshot = parse_workflow(text).unwrap();
//!
//! let located = snapshot.locate(text.find("cargo").unwrap()).unwrap();
//! assert_eq!(located.path.to_string(), "jobs.test.steps.run");
//!
//! let pattern = Parser::parse("jobs.*.steps.run").unwrap();
//! assert_eq!(snapshot.collect_all(&pattern).len(), 1);
//! ```

use lsp_types::{Position, Range};

use super::line_index::LineIndex;
use super::node::{Node, Span};
use crate::yamlpath::{Evaluator, KeyPath, Located};

/// A parsed document: text, line table and syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    text: String,
    line_index: LineIndex,
    root: Node,
}

impl Snapshot {
    pub(crate) fn new(text: String, root: Node) -> Self {
        let line_index = LineIndex::new(&text);
        Self {
            text,
            line_index,
            root,
        }
    }

    /// Returns the root node. Its span covers the whole text.
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Converts a character span to an editor range.
    pub fn range(&self, span: Span) -> Range {
        self.line_index.range(span)
    }

    pub fn offset_at(&self, position: Position) -> usize {
        self.line_index.position_to_offset(position)
    }

    /// Returns the source text covered by `span`.
    pub fn slice(&self, span: Span) -> String {
        self.line_index.slice(span)
    }

    /// Finds the innermost element at `offset` and its key-path.
    pub fn locate(&self, offset: usize) -> Option<Located<'_>> {
        crate::yamlpath::locate(&self.root, offset)
    }

    /// Collects the values of every entry whose key-path matches `pattern`.
    pub fn collect_all(&self, pattern: &KeyPath) -> Vec<&Node> {
        Evaluator::new(&self.root).collect_all(pattern)
    }
}
