//! Routes editor events to the language features.
//!
//! The editor drives a [`Session`] from its single event loop: document
//! edits, closes, focus changes, and hover or completion requests. Only
//! documents selected as workflow files are handled; everything else gets an
//! empty answer.

use std::path::Path;
use std::rc::Rc;

use lsp_types::{CompletionItem, Diagnostic, Hover, Position};

use crate::config::{Config, ConfigError};
use crate::document::text::TextDocument;
use crate::language::{
    CompletionProvider, DiagnosticsProvider, HoverProvider, RepositoryContextProvider,
    WorkflowLinter, WorkflowSelector,
};
use crate::runner::{BridgeState, CapabilityBridge, CommandRunnerHost};

pub struct Session {
    selector: WorkflowSelector,
    diagnostics: DiagnosticsProvider,
    hover: HoverProvider,
    completion: CompletionProvider,
    bridge: CapabilityBridge,
    runner: Rc<dyn CommandRunnerHost>,
}

impl Session {
    /// Wires the collaborators together according to `config`.
    pub fn new(
        config: &Config,
        repositories: Rc<dyn RepositoryContextProvider>,
        linter: Rc<dyn WorkflowLinter>,
        runner: Rc<dyn CommandRunnerHost>,
    ) -> Result<Self, ConfigError> {
        let selector = config.selector()?;
        let bridge = CapabilityBridge::new(config.command_provider()?, config.language_id.clone());

        Ok(Self {
            selector,
            diagnostics: DiagnosticsProvider::new(
                Rc::clone(&repositories),
                Rc::clone(&linter),
                config.diagnostics_source.clone(),
            ),
            hover: HoverProvider::new(Rc::clone(&repositories), Rc::clone(&linter)),
            completion: CompletionProvider::new(repositories, linter),
            bridge,
            runner,
        })
    }

    fn is_workflow(&self, document: &TextDocument) -> bool {
        self.selector.matches(document.path())
    }

    /// A document was opened or edited.
    pub async fn did_change(&self, document: &TextDocument) -> Option<usize> {
        if !self.is_workflow(document) {
            return None;
        }
        self.diagnostics.on_change(document).await
    }

    pub fn did_close(&self, path: &Path) {
        self.diagnostics.on_close(path);
    }

    /// The focused editor changed; `None` when no editor has focus.
    pub async fn did_focus(&self, document: Option<&TextDocument>) -> BridgeState {
        self.bridge
            .on_focus_change(document, self.runner.as_ref())
            .await
    }

    pub async fn hover(&self, document: &TextDocument, position: Position) -> Option<Hover> {
        if !self.is_workflow(document) {
            return None;
        }
        self.hover.hover(document, position).await
    }

    pub async fn completion(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> Vec<CompletionItem> {
        if !self.is_workflow(document) {
            return Vec::new();
        }
        self.completion.complete(document, position).await
    }

    /// Current diagnostics for `path`.
    pub fn diagnostics(&self, path: &Path) -> Vec<Diagnostic> {
        self.diagnostics.diagnostics(path)
    }

    pub fn bridge(&self) -> &CapabilityBridge {
        &self.bridge
    }
}
