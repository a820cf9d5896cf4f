//! Editor features backed by an external workflow linter.
//!
//! The linter itself (schema validation, expression checking, action
//! metadata lookups) lives outside this crate and is reached through the
//! [`WorkflowLinter`] trait. The adapters in this module translate between
//! its offset-based results and `lsp-types` structures the editor consumes.
//!
//! - `selector`: which files are workflows
//! - `diagnostics`: text change to editor diagnostics, with stale results dropped
//! - `hover` / `completion`: request-scoped lookups
//! - `syntax`: a built-in linter that reports YAML syntax errors only

pub mod completion;
pub mod diagnostics;
pub mod hover;
pub mod selector;
pub mod syntax;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::error::DocumentError;

pub use completion::CompletionProvider;
pub use diagnostics::{DiagnosticsCollection, DiagnosticsProvider};
pub use hover::HoverProvider;
pub use selector::WorkflowSelector;
pub use syntax::SyntaxLinter;

/// Errors raised by a [`WorkflowLinter`].
#[derive(Debug, Error)]
pub enum LinterError {
    #[error("linter failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// The repository a workflow file belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryContext {
    pub root: PathBuf,
    pub name: String,
}

impl RepositoryContext {
    /// Finds the closest ancestor of `path` that holds a `.git` or `.github`
    /// directory.
    pub fn discover(path: &Path) -> Option<Self> {
        path.ancestors()
            .skip(1)
            .find(|dir| dir.join(".git").is_dir() || dir.join(".github").is_dir())
            .map(Self::at)
    }

    /// A context rooted at `root`, named after its last component.
    pub fn at(root: &Path) -> Self {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            root: root.to_path_buf(),
            name,
        }
    }
}

/// Resolves the repository context for a document.
#[async_trait(?Send)]
pub trait RepositoryContextProvider {
    async fn repository(&self, path: &Path) -> Option<RepositoryContext>;
}

/// Looks for the repository on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRepositoryProvider;

#[async_trait(?Send)]
impl RepositoryContextProvider for LocalRepositoryProvider {
    async fn repository(&self, path: &Path) -> Option<RepositoryContext> {
        RepositoryContext::discover(path)
    }
}

/// A finding reported by the linter. `pos` holds character offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintDiagnostic {
    pub message: String,
    pub pos: [usize; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub diagnostics: Vec<LintDiagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverResult {
    /// Markdown text.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub value: String,
    pub description: Option<String>,
}

/// The external workflow linter.
#[async_trait(?Send)]
pub trait WorkflowLinter {
    /// Validates the whole document.
    async fn parse(
        &self,
        ctx: &RepositoryContext,
        path: &Path,
        text: &str,
    ) -> Result<ParseResult, LinterError>;

    /// Describes whatever sits at `offset`.
    async fn hover(
        &self,
        ctx: &RepositoryContext,
        path: &Path,
        text: &str,
        offset: usize,
    ) -> Result<Option<HoverResult>, LinterError>;

    /// Suggests values for the position at `offset`.
    async fn complete(
        &self,
        ctx: &RepositoryContext,
        path: &Path,
        text: &str,
        offset: usize,
    ) -> Result<Vec<CompletionEntry>, LinterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_finds_github_dir() {
        let dir = TempDir::new().unwrap();
        let workflows = dir.path().join("proj/.github/workflows");
        std::fs::create_dir_all(&workflows).unwrap();

        let ctx = RepositoryContext::discover(&workflows.join("ci.yml")).unwrap();
        assert_eq!(ctx.root, dir.path().join("proj"));
        assert_eq!(ctx.name, "proj");
    }

    #[test]
    fn test_discover_without_repository() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("loose.yml");
        assert!(RepositoryContext::discover(&file).is_none());
    }

    #[tokio::test]
    async fn test_local_provider_uses_discover() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let ctx = LocalRepositoryProvider
            .repository(&dir.path().join("ci.yml"))
            .await
            .unwrap();
        assert_eq!(ctx.root, dir.path());
    }
}
