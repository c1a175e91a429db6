//! The code panel controller
//!
//! `CodePanelController` is the single owner of the panel state: the current
//! artifact set, its tree and expansion state, the selection shown in the
//! viewer, panel visibility and focus. Views only receive references to it
//! and hand back intents. Behavior is split across submodules by concern:
//! - `file_explorer`: tree navigation and activation
//! - `clipboard`: copying the selected file
//! - `generation`: the prompt line and generation requests

mod clipboard;
mod file_explorer;
mod generation;

use crate::config::Config;
use crate::input::{Action, KeyContext};
use crate::model::{Artifact, GenerationResponse, PanelIssue};
use crate::primitives::highlight::{CodeHighlighter, StyledSpan};
use crate::services::clipboard::ClipboardService;
use crate::services::generation::GenerationSession;
use crate::services::time_source::SharedTimeSource;
use crate::view::code_viewer::CodeViewer;
use crate::view::file_tree::{ArtifactTree, FileTreeView, TreeBuild};
use crate::view::notification::{Notification, NotificationKind};
use crate::view::prompt::PromptInput;
use rust_i18n::t;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// Pane that receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Viewer,
    Prompt,
}

/// Summary of the last generation response shown above the panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSummary {
    pub message: Option<String>,
    pub vulnerabilities: usize,
    pub recommendations: Vec<String>,
}

impl ResponseSummary {
    fn from_response(response: &GenerationResponse) -> Self {
        Self {
            message: response.message.clone(),
            vulnerabilities: response.vulnerability_count(),
            recommendations: response
                .auditor_report
                .as_ref()
                .map(|report| report.recommendation_lines())
                .unwrap_or_default(),
        }
    }
}

/// Highlighted rows of the selected file, tied to the load that produced them
struct HighlightCache {
    epoch: u64,
    path: String,
    rows: Vec<Vec<StyledSpan>>,
}

/// Owns the artifact tree, selection, viewer and panel state
pub struct CodePanelController {
    config: Config,
    /// Artifacts of the current load, in input order
    artifacts: Vec<Arc<Artifact>>,
    /// Tree and expansion state; `None` once the artifacts are discarded
    file_tree: Option<FileTreeView>,
    /// Raw path of the file shown in the viewer
    selection: Option<String>,
    viewer: CodeViewer,
    panel_open: bool,
    focus: Focus,
    /// Focus to return to when the prompt closes
    focus_before_prompt: Focus,
    prompt: PromptInput,
    /// Issues raised by the latest load
    issues: Vec<PanelIssue>,
    notification: Option<Notification>,
    /// Bumped on every load or discard
    epoch: u64,
    summary: Option<ResponseSummary>,
    clipboard: ClipboardService,
    generation: Option<GenerationSession>,
    /// Where successful generation responses are saved
    response_archive: Option<PathBuf>,
    time_source: SharedTimeSource,
    highlighter: Option<CodeHighlighter>,
    highlight_cache: Option<HighlightCache>,
    warning_receiver: Option<Receiver<String>>,
    warning_count: usize,
    last_warning: Option<String>,
    should_quit: bool,
}

impl CodePanelController {
    pub fn new(config: Config, clipboard: ClipboardService, time_source: SharedTimeSource) -> Self {
        let highlighter = config
            .viewer
            .syntax_highlighting
            .then(|| CodeHighlighter::new(&config.viewer.theme));
        let panel_open = config.panel.start_open;

        Self {
            config,
            artifacts: Vec::new(),
            file_tree: None,
            selection: None,
            viewer: CodeViewer::new(),
            panel_open,
            focus: Focus::Tree,
            focus_before_prompt: Focus::Tree,
            prompt: PromptInput::new(),
            issues: Vec::new(),
            notification: None,
            epoch: 0,
            summary: None,
            clipboard,
            generation: None,
            response_archive: None,
            time_source,
            highlighter,
            highlight_cache: None,
            warning_receiver: None,
            warning_count: 0,
            last_warning: None,
            should_quit: false,
        }
    }

    /// Attach a generation session used by the prompt line
    pub fn set_generation_session(&mut self, session: GenerationSession) {
        self.generation = Some(session);
    }

    /// Save every successful generation response to `path`
    pub fn set_response_archive(&mut self, path: PathBuf) {
        self.response_archive = Some(path);
    }

    /// Receive forwarded WARN/ERROR log messages
    pub fn set_warning_receiver(&mut self, receiver: Receiver<String>) {
        self.warning_receiver = Some(receiver);
    }

    // -- Loading -----------------------------------------------------------

    /// Replace the artifact set.
    ///
    /// Rebuilds the tree with every directory expanded, selects the first
    /// artifact that made it into the tree, and records the artifacts that
    /// were skipped.
    pub fn load_artifacts(&mut self, artifacts: Vec<Artifact>) {
        let artifacts: Vec<Arc<Artifact>> = artifacts.into_iter().map(Arc::new).collect();
        let TreeBuild { tree, issues } =
            ArtifactTree::build(artifacts.iter().cloned(), self.config.panel.sibling_order);

        for issue in &issues {
            tracing::warn!("Skipped artifact: {}", issue);
        }

        let first = artifacts
            .iter()
            .find(|artifact| is_incorporated(&tree, artifact))
            .cloned();

        tracing::info!(
            "Loaded {} artifacts ({} files, {} skipped)",
            artifacts.len(),
            tree.file_count(),
            issues.len()
        );

        let mut view = FileTreeView::new(tree);
        if let Some(previous) = &self.file_tree {
            view.set_viewport_height(previous.viewport_height);
        }
        if let Some(first) = &first {
            view.reveal(&first.path);
        }

        self.epoch += 1;
        self.artifacts = artifacts;
        self.file_tree = Some(view);
        self.selection = first.as_ref().map(|artifact| artifact.path.clone());
        self.viewer.set_artifact(first);
        self.highlight_cache = None;

        let file_count = self.file_count();
        if !issues.is_empty() {
            self.notify(
                NotificationKind::Failure,
                t!("panel.skipped", count = issues.len()).to_string(),
            );
        } else if file_count > 0 {
            self.notify(
                NotificationKind::Info,
                t!("panel.loaded", count = file_count).to_string(),
            );
        }
        self.issues = issues;

        if file_count > 0 && self.config.panel.open_on_load {
            self.open_panel();
        }
    }

    /// Load a decoded generation response
    pub fn load_response(&mut self, response: GenerationResponse) {
        self.summary = Some(ResponseSummary::from_response(&response));
        self.load_artifacts(response.into_artifacts());
    }

    /// Drop the artifacts, the tree and the selection
    pub fn discard_artifacts(&mut self) {
        tracing::debug!("Discarding {} artifacts", self.artifacts.len());
        self.epoch += 1;
        self.artifacts.clear();
        self.file_tree = None;
        self.selection = None;
        self.viewer.set_artifact(None);
        self.issues.clear();
        self.summary = None;
        self.highlight_cache = None;
    }

    // -- Selection ---------------------------------------------------------

    /// Show the file at `path` in the viewer.
    ///
    /// A path absent from the tree leaves everything unchanged and is only
    /// logged.
    pub fn select_file(&mut self, path: &str) -> Result<(), PanelIssue> {
        let artifact = self
            .file_tree
            .as_ref()
            .and_then(|view| view.tree().get_file_by_path(path))
            .and_then(|node| node.artifact())
            .cloned();

        match artifact {
            Some(artifact) => {
                if let Some(view) = self.file_tree.as_mut() {
                    view.reveal(&artifact.path);
                }
                self.set_selection(artifact);
                Ok(())
            }
            None => {
                let issue = PanelIssue::UnknownSelectionTarget {
                    path: path.to_string(),
                };
                tracing::debug!("Ignoring selection: {}", issue);
                Err(issue)
            }
        }
    }

    fn set_selection(&mut self, artifact: Arc<Artifact>) {
        tracing::debug!("Selected {}", artifact.path);
        self.selection = Some(artifact.path.clone());
        self.viewer.set_artifact(Some(artifact));
    }

    // -- Panel visibility --------------------------------------------------

    pub fn open_panel(&mut self) {
        self.panel_open = true;
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
        tracing::debug!("Panel {}", if self.panel_open { "opened" } else { "closed" });
    }

    // -- Input -------------------------------------------------------------

    /// Context used to resolve key bindings
    pub fn key_context(&self) -> KeyContext {
        match self.focus {
            Focus::Prompt => KeyContext::Prompt,
            _ if !self.panel_open => KeyContext::Closed,
            Focus::Tree => KeyContext::FileTree,
            Focus::Viewer => KeyContext::CodeViewer,
        }
    }

    /// Apply an action from the input layer
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::TogglePanel => self.toggle_panel(),
            Action::FocusNext => self.focus_next(),
            Action::CopySelection => self.copy_selection(),
            Action::DiscardArtifacts => {
                self.discard_artifacts();
                self.notify(NotificationKind::Info, t!("panel.discarded").to_string());
            }
            Action::OpenPrompt => self.open_prompt(),
            Action::Quit => self.should_quit = true,

            Action::FileTreeUp => self.file_tree_navigate_up(),
            Action::FileTreeDown => self.file_tree_navigate_down(),
            Action::FileTreePageUp => self.file_tree_page_up(),
            Action::FileTreePageDown => self.file_tree_page_down(),
            Action::FileTreeFirst => self.file_tree_first(),
            Action::FileTreeLast => self.file_tree_last(),
            Action::FileTreeExpand => self.file_tree_expand(),
            Action::FileTreeCollapse => self.file_tree_collapse(),
            Action::FileTreeActivate => self.file_tree_activate(),

            Action::ViewerScrollUp => self.viewer.scroll_up(1),
            Action::ViewerScrollDown => self.viewer.scroll_down(1),
            Action::ViewerPageUp => self.viewer.page_up(),
            Action::ViewerPageDown => self.viewer.page_down(),
            Action::ViewerTop => self.viewer.scroll_to_top(),
            Action::ViewerBottom => self.viewer.scroll_to_bottom(),

            Action::PromptInsert(c) => self.prompt.insert_char(c),
            Action::PromptBackspace => self.prompt.backspace(),
            Action::PromptLeft => self.prompt.move_left(),
            Action::PromptRight => self.prompt.move_right(),
            Action::PromptSubmit => self.submit_prompt(),
            Action::PromptCancel => self.cancel_prompt(),
        }
    }

    /// Insert pasted text into the prompt, ignoring it elsewhere
    pub fn handle_paste(&mut self, text: &str) {
        if self.focus != Focus::Prompt {
            return;
        }
        for c in text.chars().filter(|c| !c.is_control()) {
            self.prompt.insert_char(c);
        }
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Tree => Focus::Viewer,
            Focus::Viewer => Focus::Tree,
            Focus::Prompt => Focus::Prompt,
        };
    }

    // -- Periodic work -----------------------------------------------------

    /// Expire notifications and drain finished background work.
    ///
    /// Called once per event-loop iteration.
    pub fn tick(&mut self) {
        self.drain_clipboard();
        self.drain_generation();
        self.drain_warnings();

        let now = self.time_source.now();
        let ttl = self.config.notifications.ttl();
        if self
            .notification
            .as_ref()
            .is_some_and(|notification| notification.is_expired(now, ttl))
        {
            self.notification = None;
        }
    }

    fn drain_warnings(&mut self) {
        let Some(receiver) = &self.warning_receiver else {
            return;
        };
        while let Ok(message) = receiver.try_recv() {
            self.warning_count += 1;
            self.last_warning = Some(message);
        }
    }

    pub(crate) fn notify(&mut self, kind: NotificationKind, message: String) {
        self.notification = Some(Notification::new(kind, message, self.time_source.now()));
    }

    // -- Accessors ---------------------------------------------------------

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn artifacts(&self) -> &[Arc<Artifact>] {
        &self.artifacts
    }

    pub fn file_tree(&self) -> Option<&FileTreeView> {
        self.file_tree.as_ref()
    }

    pub fn file_tree_mut(&mut self) -> Option<&mut FileTreeView> {
        self.file_tree.as_mut()
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn viewer(&self) -> &CodeViewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut CodeViewer {
        &mut self.viewer
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn prompt(&self) -> &PromptInput {
        &self.prompt
    }

    pub fn issues(&self) -> &[PanelIssue] {
        &self.issues
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn summary(&self) -> Option<&ResponseSummary> {
        self.summary.as_ref()
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn last_warning(&self) -> Option<&str> {
        self.last_warning.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Number of files in the current tree
    pub fn file_count(&self) -> usize {
        self.file_tree
            .as_ref()
            .map(|view| view.tree().file_count())
            .unwrap_or(0)
    }

    /// Highlighted rows of the selected file, computed once per selection
    pub fn highlighted_rows(&mut self) -> Option<&[Vec<StyledSpan>]> {
        self.code_view().1
    }

    /// Viewer state together with the highlighted rows of its artifact
    pub fn code_view(&mut self) -> (&CodeViewer, Option<&[Vec<StyledSpan>]>) {
        self.refresh_highlights();
        let rows = self
            .highlight_cache
            .as_ref()
            .filter(|cache| {
                self.viewer
                    .artifact()
                    .is_some_and(|artifact| artifact.path == cache.path)
            })
            .map(|cache| cache.rows.as_slice());
        (&self.viewer, rows)
    }

    fn refresh_highlights(&mut self) {
        let (Some(highlighter), Some(artifact)) = (self.highlighter.as_ref(), self.viewer.artifact())
        else {
            return;
        };

        let stale = self
            .highlight_cache
            .as_ref()
            .map_or(true, |cache| cache.epoch != self.epoch || cache.path != artifact.path);
        if stale {
            self.highlight_cache = Some(HighlightCache {
                epoch: self.epoch,
                path: artifact.path.clone(),
                rows: highlighter.highlight(artifact),
            });
        }
    }
}

/// True if `artifact` itself (not an earlier artifact with the same path) is in the tree
fn is_incorporated(tree: &ArtifactTree, artifact: &Arc<Artifact>) -> bool {
    tree.get_file_by_path(&artifact.path)
        .and_then(|node| node.artifact())
        .is_some_and(|stored| Arc::ptr_eq(stored, artifact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clipboard::{ClipboardError, MemoryClipboard};
    use crate::services::time_source::TestTimeSource;
    use std::time::Duration;

    fn controller_with(clipboard: MemoryClipboard) -> (CodePanelController, Arc<TestTimeSource>) {
        let time = TestTimeSource::shared();
        let mut config = Config::default();
        config.viewer.syntax_highlighting = false;
        config.panel.start_open = false;
        let controller =
            CodePanelController::new(config, ClipboardService::memory(clipboard), time.clone());
        (controller, time)
    }

    fn controller() -> CodePanelController {
        controller_with(MemoryClipboard::new()).0
    }

    fn sample() -> Vec<Artifact> {
        vec![
            Artifact::new("src/a.ts", "A"),
            Artifact::new("src/b.ts", "B"),
            Artifact::new("README.md", "R"),
        ]
    }

    #[test]
    fn test_load_selects_first_artifact_and_opens() {
        let mut panel = controller();
        assert!(!panel.is_panel_open());

        panel.load_artifacts(sample());

        assert_eq!(panel.selection(), Some("src/a.ts"));
        assert_eq!(panel.viewer().copy_text(), Some("A"));
        assert_eq!(panel.file_count(), 3);
        assert!(panel.is_panel_open());
        assert_eq!(panel.epoch(), 1);
        assert!(panel.issues().is_empty());
    }

    #[test]
    fn test_load_empty_list_clears_selection() {
        let mut panel = controller();
        panel.load_artifacts(sample());
        panel.load_artifacts(Vec::new());

        assert_eq!(panel.selection(), None);
        assert!(panel.viewer().is_empty_state());
        assert_eq!(panel.file_count(), 0);
    }

    #[test]
    fn test_selection_skips_rejected_first_artifact() {
        let mut panel = controller();
        panel.load_artifacts(vec![
            Artifact::new("//", "bad"),
            Artifact::new("src", "file named src"),
            Artifact::new("src/a.ts", "collides"),
        ]);

        assert_eq!(panel.selection(), Some("src"));
        assert_eq!(panel.issues().len(), 2);
        assert!(panel.issues().iter().all(PanelIssue::is_skipped_artifact));
        assert_eq!(
            panel.notification().map(|n| n.kind),
            Some(NotificationKind::Failure)
        );
    }

    #[test]
    fn test_duplicate_path_keeps_first_content() {
        let mut panel = controller();
        panel.load_artifacts(vec![
            Artifact::new("a.txt", "first"),
            Artifact::new("a.txt", "second"),
        ]);
        assert_eq!(panel.viewer().copy_text(), Some("first"));
        assert_eq!(panel.issues().len(), 1);
    }

    #[test]
    fn test_select_file() {
        let mut panel = controller();
        panel.load_artifacts(sample());

        assert!(panel.select_file("README.md").is_ok());
        assert_eq!(panel.selection(), Some("README.md"));
        assert_eq!(panel.viewer().copy_text(), Some("R"));

        let err = panel.select_file("missing.rs").unwrap_err();
        assert_eq!(
            err,
            PanelIssue::UnknownSelectionTarget {
                path: "missing.rs".to_string()
            }
        );
        assert_eq!(panel.selection(), Some("README.md"));
    }

    #[test]
    fn test_select_file_keeps_expansion() {
        let mut panel = controller();
        panel.load_artifacts(sample());
        let src = panel.file_tree().unwrap().tree().get_node_by_path("src").unwrap().id;
        panel.file_tree_mut().unwrap().collapse(src);

        panel.select_file("README.md").unwrap();
        assert!(!panel.file_tree().unwrap().is_expanded(src));
    }

    #[test]
    fn test_new_load_resets_expansion() {
        let mut panel = controller();
        panel.load_artifacts(sample());
        let src = panel.file_tree().unwrap().tree().get_node_by_path("src").unwrap().id;
        panel.file_tree_mut().unwrap().collapse(src);

        panel.load_artifacts(sample());
        let view = panel.file_tree().unwrap();
        let src = view.tree().get_node_by_path("src").unwrap().id;
        assert!(view.is_expanded(src));
        assert_eq!(panel.epoch(), 2);
    }

    #[test]
    fn test_panel_visibility_does_not_touch_state() {
        let mut panel = controller();
        panel.load_artifacts(sample());
        panel.select_file("src/b.ts").unwrap();

        panel.close_panel();
        assert!(!panel.is_panel_open());
        assert_eq!(panel.key_context(), KeyContext::Closed);
        assert_eq!(panel.selection(), Some("src/b.ts"));

        panel.toggle_panel();
        assert!(panel.is_panel_open());
        assert_eq!(panel.selection(), Some("src/b.ts"));
    }

    #[test]
    fn test_close_then_discard_clears_everything() {
        let mut panel = controller();
        panel.load_artifacts(sample());
        panel.close_panel();
        panel.discard_artifacts();

        assert!(panel.file_tree().is_none());
        assert!(panel.artifacts().is_empty());
        assert_eq!(panel.selection(), None);
        assert!(panel.viewer().is_empty_state());
    }

    #[test]
    fn test_copy_puts_raw_content_on_clipboard() {
        let clipboard = MemoryClipboard::new();
        let (mut panel, _time) = controller_with(clipboard.clone());
        panel.load_artifacts(vec![Artifact::new("a.txt", "a\nb")]);

        panel.handle_action(Action::CopySelection);
        panel.tick();

        assert_eq!(clipboard.contents().as_deref(), Some("a\nb"));
        assert_eq!(
            panel.notification().map(|n| n.kind),
            Some(NotificationKind::Success)
        );
    }

    #[test]
    fn test_copy_failure_is_transient_and_keeps_state() {
        let clipboard = MemoryClipboard::failing(ClipboardError::Denied("no".to_string()));
        let (mut panel, time) = controller_with(clipboard);
        panel.load_artifacts(sample());

        panel.copy_selection();
        panel.tick();
        assert_eq!(
            panel.notification().map(|n| n.kind),
            Some(NotificationKind::Failure)
        );
        assert_eq!(panel.selection(), Some("src/a.ts"));

        time.advance(Duration::from_millis(2499));
        panel.tick();
        assert!(panel.notification().is_some());

        time.advance(Duration::from_millis(1));
        panel.tick();
        assert!(panel.notification().is_none());
    }

    #[test]
    fn test_copy_without_selection_does_nothing() {
        let clipboard = MemoryClipboard::new();
        let (mut panel, _time) = controller_with(clipboard.clone());
        panel.copy_selection();
        panel.tick();
        assert_eq!(clipboard.contents(), None);
    }

    #[test]
    fn test_load_response_records_summary() {
        let mut panel = controller();
        let response = GenerationResponse::from_json(
            r#"{"message": "done",
                "final_code": {"artifacts": [{"filename": "main.py", "content": "x"}]},
                "auditor_report": {"vulnerabilities_found": true,
                                   "vulnerabilities_list": ["a", "b"],
                                   "recommendations": "validate input"}}"#,
        )
        .unwrap();

        panel.load_response(response);

        let summary = panel.summary().unwrap();
        assert_eq!(summary.message.as_deref(), Some("done"));
        assert_eq!(summary.vulnerabilities, 2);
        assert_eq!(summary.recommendations, vec!["validate input"]);
        assert_eq!(panel.selection(), Some("main.py"));
    }

    #[test]
    fn test_warnings_are_counted() {
        let mut panel = controller();
        let (tx, rx) = std::sync::mpsc::channel();
        panel.set_warning_receiver(rx);

        tx.send("first".to_string()).unwrap();
        tx.send("second".to_string()).unwrap();
        panel.tick();

        assert_eq!(panel.warning_count(), 2);
        assert_eq!(panel.last_warning(), Some("second"));
    }

    #[test]
    fn test_highlight_cache_follows_selection() {
        let time = TestTimeSource::shared();
        let mut panel = CodePanelController::new(
            Config::default(),
            ClipboardService::memory(MemoryClipboard::new()),
            time,
        );
        panel.load_artifacts(vec![
            Artifact::new("a.rs", "fn a() {}"),
            Artifact::new("b.rs", "fn b() {}\n"),
        ]);

        assert_eq!(panel.highlighted_rows().map(|rows| rows.len()), Some(1));
        panel.select_file("b.rs").unwrap();
        assert_eq!(panel.highlighted_rows().map(|rows| rows.len()), Some(2));
    }
}
