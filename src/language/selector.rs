//! Decides which files are workflow definitions.

use std::path::Path;

use glob::{MatchOptions, Pattern, PatternError};

/// Default glob patterns for workflow files.
pub const DEFAULT_WORKFLOW_GLOBS: [&str; 2] = [
    "**/.github/workflows/**/*.yml",
    "**/.github/workflows/**/*.yaml",
];

/// Matches document paths against a set of glob patterns.
#[derive(Debug, Clone)]
pub struct WorkflowSelector {
    patterns: Vec<Pattern>,
}

impl WorkflowSelector {
    /// Compiles the given glob patterns.
    pub fn new<S: AsRef<str>>(globs: &[S]) -> Result<Self, PatternError> {
        let patterns = globs
            .iter()
            .map(|g| Pattern::new(g.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if `path` is a workflow file.
    ///
    /// Backslashes are treated as separators so Windows paths match the same
    /// patterns.
    pub fn matches(&self, path: &Path) -> bool {
        let normalized = path.to_string_lossy().replace('\\', "/");
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(&normalized, options))
    }
}

impl Default for WorkflowSelector {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_WORKFLOW_GLOBS
                .iter()
                .filter_map(|g| Pattern::new(g).ok())
                .collect(),
        }
    }
}
