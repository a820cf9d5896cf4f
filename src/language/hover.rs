//! Hover documentation from the workflow linter.

use std::rc::Rc;

use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position};

use super::{RepositoryContextProvider, WorkflowLinter};
use crate::document::text::TextDocument;

pub struct HoverProvider {
    repositories: Rc<dyn RepositoryContextProvider>,
    linter: Rc<dyn WorkflowLinter>,
}

impl HoverProvider {
    pub fn new(
        repositories: Rc<dyn RepositoryContextProvider>,
        linter: Rc<dyn WorkflowLinter>,
    ) -> Self {
        Self {
            repositories,
            linter,
        }
    }

    /// Returns markdown documentation for whatever sits at `position`.
    ///
    /// Linter failures are logged and treated as "nothing to show".
    pub async fn hover(&self, document: &TextDocument, position: Position) -> Option<Hover> {
        let ctx = self.repositories.repository(document.path()).await?;
        let offset = document.offset_at(position);

        let result = match self
            .linter
            .hover(&ctx, document.path(), document.text(), offset)
            .await
        {
            Ok(result) => result?,
            Err(e) => {
                tracing::debug!(error = %e, "hover lookup failed");
                return None;
            }
        };

        Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: result.description,
            }),
            range: None,
        })
    }
}
