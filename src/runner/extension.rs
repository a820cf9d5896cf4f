//! The surface of the third-party command-runner extension.

use std::sync::Arc;

use async_trait::async_trait;
use lsp_types::{Position, Range};
use thiserror::Error;

use crate::document::text::TextDocument;

/// Errors reported by the command-runner host.
#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("command-runner activation failed: {0}")]
    Activation(String),
}

/// Queries the command runner calls back into.
///
/// Both functions answer "nothing here" rather than failing; the runner has
/// no way to surface errors to the user.
pub trait CommandLocationProvider {
    /// Returns the command line containing `position`, if any.
    fn provide_single_line_range_from_position(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> Option<Range>;

    /// Returns every command line in the document, step by step.
    fn get_all_single_line_command_locations(&self, document: &TextDocument) -> Vec<Range>;
}

/// The editor-side handle on the command-runner extension.
#[async_trait(?Send)]
pub trait CommandRunnerHost {
    /// Returns true if the extension is present in the editor.
    async fn is_installed(&self) -> bool;

    /// Loads the extension so it can accept registrations.
    async fn activate(&self) -> Result<(), ExtensionError>;

    /// Hands the runner the queries for one language id.
    fn register_language_support(
        &self,
        language_id: &str,
        provider: Arc<dyn CommandLocationProvider>,
    );
}
