//! Completion suggestions from the workflow linter.

use std::rc::Rc;

use lsp_types::{CompletionItem, Documentation, MarkupContent, MarkupKind, Position};

use super::{CompletionEntry, RepositoryContextProvider, WorkflowLinter};
use crate::document::text::TextDocument;

pub struct CompletionProvider {
    repositories: Rc<dyn RepositoryContextProvider>,
    linter: Rc<dyn WorkflowLinter>,
}

impl CompletionProvider {
    pub fn new(
        repositories: Rc<dyn RepositoryContextProvider>,
        linter: Rc<dyn WorkflowLinter>,
    ) -> Self {
        Self {
            repositories,
            linter,
        }
    }

    /// Suggestions for `position`; empty when the linter has none or fails.
    pub async fn complete(&self, document: &TextDocument, position: Position) -> Vec<CompletionItem> {
        let Some(ctx) = self.repositories.repository(document.path()).await else {
            return Vec::new();
        };
        let offset = document.offset_at(position);

        match self
            .linter
            .complete(&ctx, document.path(), document.text(), offset)
            .await
        {
            Ok(entries) => entries.into_iter().map(to_completion_item).collect(),
            Err(e) => {
                tracing::debug!(error = %e, "completion lookup failed");
                Vec::new()
            }
        }
    }
}

fn to_completion_item(entry: CompletionEntry) -> CompletionItem {
    CompletionItem {
        label: entry.value,
        documentation: entry.description.map(|value| {
            Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            })
        }),
        ..CompletionItem::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{HoverResult, LinterError, ParseResult, RepositoryContext};
    use async_trait::async_trait;
    use std::path::Path;

    struct Repo(bool);

    #[async_trait(?Send)]
    impl RepositoryContextProvider for Repo {
        async fn repository(&self, _path: &Path) -> Option<RepositoryContext> {
            self.0.then(|| RepositoryContext::at(Path::new("/repo")))
        }
    }

    /// Offers runner labels, failing when the text is empty.
    struct Runners;

    #[async_trait(?Send)]
    impl WorkflowLinter for Runners {
        async fn parse(
            &self,
            _ctx: &RepositoryContext,
            _path: &Path,
            _text: &str,
        ) -> Result<ParseResult, LinterError> {
            Ok(ParseResult::default())
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
            text: &str,
            _offset: usize,
        ) -> Result<Vec<CompletionEntry>, LinterError> {
            if text.is_empty() {
                return Err(LinterError::Failed("nothing to complete".to_string()));
            }
            Ok(vec![
                CompletionEntry {
                    value: "ubuntu-latest".to_string(),
                    description: Some("Latest *Ubuntu* runner".to_string()),
                },
                CompletionEntry {
                    value: "self-hosted".to_string(),
                    description: None,
                },
            ])
        }
    }

    fn doc(text: &str) -> TextDocument {
        TextDocument::new("/repo/.github/workflows/ci.yml", 1, text)
    }

    #[tokio::test]
    async fn test_entries_become_items() {
        let provider = CompletionProvider::new(Rc::new(Repo(true)), Rc::new(Runners));
        let items = provider.complete(&doc("runs-on: "), Position::new(0, 9)).await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, "ubuntu-latest");
        assert_eq!(
            items[0].documentation,
            Some(Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value: "Latest *Ubuntu* runner".to_string(),
            }))
        );
        assert!(items[1].documentation.is_none());
    }

    #[tokio::test]
    async fn test_failures_and_missing_repository_are_empty() {
        let failing = CompletionProvider::new(Rc::new(Repo(true)), Rc::new(Runners));
        assert!(failing.complete(&doc(""), Position::new(0, 0)).await.is_empty());

        let no_repo = CompletionProvider::new(Rc::new(Repo(false)), Rc::new(Runners));
        assert!(no_repo.complete(&doc("runs-on: "), Position::new(0, 9)).await.is_empty());
    }
}
