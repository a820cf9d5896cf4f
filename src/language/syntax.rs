//! A linter that only checks YAML well-formedness.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;

use super::{
    CompletionEntry, HoverResult, LintDiagnostic, LinterError, ParseResult, RepositoryContext,
    WorkflowLinter,
};
use crate::document::error::DocumentError;
use crate::document::node::Node;
use crate::document::parser::parse_workflow;

/// Reports syntax errors, a non-mapping root, and duplicate mapping keys.
///
/// Knows nothing about the workflow schema, so hover and completion are
/// always empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxLinter;

impl SyntaxLinter {
    /// Lints `text` without needing a repository.
    pub fn check(&self, text: &str) -> ParseResult {
        let snapshot = match parse_workflow(text) {
            Ok(snapshot) => snapshot,
            Err(DocumentError::Syntax {
                message, offset, ..
            }) => {
                let len = text.chars().count();
                let start = offset.min(len);
                return ParseResult {
                    diagnostics: vec![LintDiagnostic {
                        message,
                        pos: [start, (start + 1).min(len)],
                    }],
                };
            }
        };

        let mut diagnostics = Vec::new();
        let root = snapshot.root();
        if !matches!(root, Node::Mapping(_)) {
            let span = root.span();
            diagnostics.push(LintDiagnostic {
                message: "workflow must be a mapping".to_string(),
                pos: [span.start, span.end],
            });
        }
        duplicate_keys(root, &mut diagnostics);
        ParseResult { diagnostics }
    }
}

fn duplicate_keys(node: &Node, diagnostics: &mut Vec<LintDiagnostic>) {
    match node {
        Node::Mapping(mapping) => {
            let mut seen = HashSet::new();
            for pair in &mapping.pairs {
                if !seen.insert(pair.key.value.as_str()) {
                    diagnostics.push(LintDiagnostic {
                        message: format!("duplicate key '{}'", pair.key.value),
                        pos: [pair.key.span.start, pair.key.span.end],
                    });
                }
                duplicate_keys(&pair.value, diagnostics);
            }
        }
        Node::Sequence(sequence) => {
            for item in &sequence.items {
                duplicate_keys(item, diagnostics);
            }
        }
        Node::Scalar(_) => {}
    }
}

#[async_trait(?Send)]
impl WorkflowLinter for SyntaxLinter {
    async fn parse(
        &self,
        _ctx: &RepositoryContext,
        _path: &Path,
        text: &str,
    ) -> Result<ParseResult, LinterError> {
        Ok(self.check(text))
    }

    async fn hover(
        &self,
        _ctx: &RepositoryContext,
        _path: &Path,
        _text: &str,
        _offset: usize,
    ) -> Result<Option<HoverResult>, LinterError> {
        Ok(None)
    }

    async fn complete(
        &self,
        _ctx: &RepositoryContext,
        _path: &Path,
        _text: &str,
        _offset: usize,
    ) -> Result<Vec<CompletionEntry>, LinterError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_workflow_is_clean() {
        let result = SyntaxLinter.check("on: push\njobs:\n  a:\n    steps: []\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_syntax_error_points_at_scanner_position() {
        let text = "jobs:\n  build: [a, b\n";
        let result = SyntaxLinter.check(text);
        assert_eq!(result.diagnostics.len(), 1);
        let [start, end] = result.diagnostics[0].pos;
        assert!(start <= end && end <= text.len());
    }

    #[test]
    fn test_duplicate_keys() {
        let text = "on: push\njobs:\n  a: {}\n  a: {}\non: pull_request\n";
        let result = SyntaxLinter.check(text);
        let messages: Vec<_> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["duplicate key 'a'", "duplicate key 'on'"]);
        assert_eq!(result.diagnostics[1].pos, [31, 33]);
    }

    #[test]
    fn test_non_mapping_root() {
        let result = SyntaxLinter.check("- a\n- b\n");
        assert_eq!(result.diagnostics[0].message, "workflow must be a mapping");
        assert_eq!(result.diagnostics[0].pos, [0, 8]);
    }

    #[tokio::test]
    async fn test_hover_and_completion_are_empty() {
        let ctx = RepositoryContext::at(Path::new("/repo"));
        let path = Path::new("/repo/.github/workflows/ci.yml");
        assert!(SyntaxLinter.hover(&ctx, path, "on: push", 0).await.unwrap().is_none());
        assert!(SyntaxLinter.complete(&ctx, path, "on: push", 0).await.unwrap().is_empty());
    }
}
