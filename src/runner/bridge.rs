//! One-shot wiring of workflow command locations into the command runner.
//!
//! The runner extension is optional. The bridge waits until the user focuses
//! a workflow file while the extension is installed, then activates it and
//! registers a [`WorkflowCommandProvider`] exactly once per process.

use std::cell::Cell;
use std::sync::Arc;

use lsp_types::{Position, Range};

use super::extension::{CommandLocationProvider, CommandRunnerHost};
use super::ranges::command_ranges;
use crate::document::parser::parse_workflow;
use crate::document::text::TextDocument;
use crate::document::tree::Snapshot;
use crate::language::selector::WorkflowSelector;
use crate::yamlpath::KeyPath;

/// Registration state of the bridge. `Registered` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Unregistered,
    Registered,
}

/// Answers command-runner queries for workflow documents.
#[derive(Debug, Clone)]
pub struct WorkflowCommandProvider {
    enable_path: KeyPath,
    selector: WorkflowSelector,
}

impl WorkflowCommandProvider {
    pub fn new(enable_path: KeyPath, selector: WorkflowSelector) -> Self {
        Self {
            enable_path,
            selector,
        }
    }

    pub fn enable_path(&self) -> &KeyPath {
        &self.enable_path
    }

    pub fn selector(&self) -> &WorkflowSelector {
        &self.selector
    }

    /// Parses the document if it is a workflow file with valid YAML.
    fn snapshot(&self, document: &TextDocument) -> Option<Snapshot> {
        if !self.selector.matches(document.path()) {
            tracing::debug!(path = %document.path().display(), "not a workflow file");
            return None;
        }
        match parse_workflow(document.text()) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::debug!(path = %document.path().display(), error = %e, "skipping unparsable workflow");
                None
            }
        }
    }
}

impl CommandLocationProvider for WorkflowCommandProvider {
    fn provide_single_line_range_from_position(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> Option<Range> {
        let snapshot = self.snapshot(document)?;
        let offset = snapshot.offset_at(position);
        let located = snapshot.locate(offset)?;
        if !self.enable_path.matches(&located.path) {
            return None;
        }

        let pair = located.pair()?;
        if !pair.value.span().contains(offset) {
            return None;
        }

        command_ranges(&snapshot, &pair.value)
            .into_iter()
            .find(|r| r.contains(position))
            .map(|r| r.range)
    }

    fn get_all_single_line_command_locations(&self, document: &TextDocument) -> Vec<Range> {
        let Some(snapshot) = self.snapshot(document) else {
            return Vec::new();
        };

        snapshot
            .collect_all(&self.enable_path)
            .into_iter()
            .flat_map(|value| command_ranges(&snapshot, value))
            .map(|r| r.range)
            .collect()
    }
}

/// Lazily registers the workflow provider with the command runner.
pub struct CapabilityBridge {
    state: Cell<BridgeState>,
    language_id: String,
    provider: Arc<WorkflowCommandProvider>,
}

impl CapabilityBridge {
    pub fn new(provider: WorkflowCommandProvider, language_id: impl Into<String>) -> Self {
        Self {
            state: Cell::new(BridgeState::Unregistered),
            language_id: language_id.into(),
            provider: Arc::new(provider),
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state.get()
    }

    pub fn provider(&self) -> Arc<WorkflowCommandProvider> {
        Arc::clone(&self.provider)
    }

    /// Handles the editor focusing `document` (or nothing).
    ///
    /// The state flips to `Registered` before activation is awaited, so focus
    /// events that arrive in the meantime do not start a second activation.
    /// A failed activation is logged and never retried.
    pub async fn on_focus_change(
        &self,
        document: Option<&TextDocument>,
        host: &dyn CommandRunnerHost,
    ) -> BridgeState {
        if self.state.get() == BridgeState::Registered {
            return BridgeState::Registered;
        }
        let Some(document) = document else {
            return self.state.get();
        };
        if !self.provider.selector().matches(document.path()) {
            return self.state.get();
        }
        if !host.is_installed().await {
            tracing::debug!("command runner not installed");
            return self.state.get();
        }
        // Another focus event may have won the race while we were suspended.
        if self.state.replace(BridgeState::Registered) == BridgeState::Registered {
            return BridgeState::Registered;
        }

        match host.activate().await {
            Ok(()) => {
                let provider: Arc<dyn CommandLocationProvider> = self.provider.clone();
                host.register_language_support(&self.language_id, provider);
                tracing::info!(
                    language_id = %self.language_id,
                    enable_path = %self.provider.enable_path(),
                    "registered command runner support"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "command runner activation failed");
            }
        }
        BridgeState::Registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::extension::ExtensionError;
    use crate::yamlpath::Parser;
    use async_trait::async_trait;
    use std::cell::RefCell;

    const WORKFLOW: &str = "\
jobs:
  build:
    steps:
      - run: |
          echo one
          echo two
      - run: make
";

    #[derive(Default)]
    struct FakeHost {
        installed: bool,
        fail_activation: bool,
        activations: Cell<usize>,
        registered: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl CommandRunnerHost for FakeHost {
        async fn is_installed(&self) -> bool {
            self.installed
        }

        async fn activate(&self) -> Result<(), ExtensionError> {
            self.activations.set(self.activations.get() + 1);
            if self.fail_activation {
                Err(ExtensionError::Activation("boom".to_string()))
            } else {
                Ok(())
            }
        }

        fn register_language_support(
            &self,
            language_id: &str,
            _provider: Arc<dyn CommandLocationProvider>,
        ) {
            self.registered.borrow_mut().push(language_id.to_string());
        }
    }

    fn provider() -> WorkflowCommandProvider {
        WorkflowCommandProvider::new(
            Parser::parse("jobs.*.steps.run").unwrap(),
            WorkflowSelector::default(),
        )
    }

    fn workflow(text: &str) -> TextDocument {
        TextDocument::new("/repo/.github/workflows/ci.yml", 1, text)
    }

    #[test]
    fn test_point_query_inside_block_line() {
        let range = provider()
            .provide_single_line_range_from_position(&workflow(WORKFLOW), Position::new(5, 12))
            .unwrap();
        assert_eq!(range, Range::new(Position::new(5, 10), Position::new(5, 18)));
    }

    #[test]
    fn test_point_query_on_header_or_key_is_none() {
        let provider = provider();
        let doc = workflow(WORKFLOW);
        // `|` header
        assert!(provider
            .provide_single_line_range_from_position(&doc, Position::new(3, 13))
            .is_none());
        // `run` key
        assert!(provider
            .provide_single_line_range_from_position(&doc, Position::new(3, 9))
            .is_none());
    }

    #[test]
    fn test_point_query_outside_enable_path_is_none() {
        let doc = workflow("jobs:\n  build:\n    runs-on: ubuntu-latest\n");
        assert!(provider()
            .provide_single_line_range_from_position(&doc, Position::new(2, 15))
            .is_none());
    }

    #[test]
    fn test_enumerate_all_in_step_then_line_order() {
        let ranges = provider().get_all_single_line_command_locations(&workflow(WORKFLOW));
        assert_eq!(
            ranges,
            vec![
                Range::new(Position::new(4, 10), Position::new(4, 18)),
                Range::new(Position::new(5, 10), Position::new(5, 18)),
                Range::new(Position::new(6, 13), Position::new(6, 17)),
            ]
        );
    }

    #[test]
    fn test_non_workflow_and_malformed_documents() {
        let provider = provider();
        let other = TextDocument::new("/repo/config.yml", 1, WORKFLOW);
        assert!(provider.get_all_single_line_command_locations(&other).is_empty());
        assert!(provider
            .provide_single_line_range_from_position(&other, Position::new(4, 12))
            .is_none());

        let broken = workflow("jobs: [unclosed\n");
        assert!(provider.get_all_single_line_command_locations(&broken).is_empty());
        assert!(provider
            .provide_single_line_range_from_position(&broken, Position::new(0, 3))
            .is_none());
    }

    #[tokio::test]
    async fn test_registers_once() {
        let bridge = CapabilityBridge::new(provider(), "github-actions-workflow");
        let host = FakeHost {
            installed: true,
            ..Default::default()
        };
        let doc = workflow(WORKFLOW);

        assert_eq!(bridge.on_focus_change(Some(&doc), &host).await, BridgeState::Registered);
        assert_eq!(bridge.on_focus_change(Some(&doc), &host).await, BridgeState::Registered);
        assert_eq!(host.activations.get(), 1);
        assert_eq!(*host.registered.borrow(), vec!["github-actions-workflow"]);
    }

    #[tokio::test]
    async fn test_ignores_other_files_and_missing_extension() {
        let bridge = CapabilityBridge::new(provider(), "github-actions-workflow");
        let installed = FakeHost {
            installed: true,
            ..Default::default()
        };
        let other = TextDocument::new("/repo/src/main.rs", 1, "fn main() {}");
        assert_eq!(
            bridge.on_focus_change(Some(&other), &installed).await,
            BridgeState::Unregistered
        );
        assert_eq!(bridge.on_focus_change(None, &installed).await, BridgeState::Unregistered);

        let missing = FakeHost::default();
        assert_eq!(
            bridge.on_focus_change(Some(&workflow(WORKFLOW)), &missing).await,
            BridgeState::Unregistered
        );
        assert_eq!(installed.activations.get(), 0);
    }

    #[tokio::test]
    async fn test_failed_activation_is_not_retried() {
        let bridge = CapabilityBridge::new(provider(), "github-actions-workflow");
        let host = FakeHost {
            installed: true,
            fail_activation: true,
            ..Default::default()
        };
        let doc = workflow(WORKFLOW);
        bridge.on_focus_change(Some(&doc), &host).await;
        bridge.on_focus_change(Some(&doc), &host).await;

        assert_eq!(bridge.state(), BridgeState::Registered);
        assert_eq!(host.activations.get(), 1);
        assert!(host.registered.borrow().is_empty());
    }
}
