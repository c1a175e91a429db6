use crate::common::fixtures::{long_file, web_project};
use crate::common::harness::PanelTestHarness;
use codepanel::app::Focus;
use codepanel::config::Config;
use codepanel::model::{Artifact, GenerationResponse, PanelIssue};
use codepanel::services::clipboard::{ClipboardError, MemoryClipboard};
use codepanel::ui::file_explorer::outline;
use codepanel::view::file_tree::SiblingOrder;
use crossterm::event::{KeyCode, KeyModifiers};
use std::time::Duration;

/// Loading shows the tree and opens the first generated file
#[test]
fn test_load_shows_tree_and_first_file() {
    let mut harness = PanelTestHarness::new(80, 20).unwrap();
    harness.load(web_project()).unwrap();

    harness.assert_screen_contains("Files (5)");
    harness.assert_screen_contains("components");
    harness.assert_screen_contains("Button.tsx");
    harness.assert_screen_contains("package.json");

    // Viewer title and numbered rows of src/index.ts
    harness.assert_screen_contains(" src/index.ts ");
    harness.assert_screen_contains("1 │ import { render } from './render';");
    harness.assert_screen_contains("3 │ render(document.body);");

    harness.assert_screen_contains("Loaded 5 generated files");
    assert_eq!(harness.panel().selection(), Some("src/index.ts"));
}

/// Moving the cursor alone does not change the viewer; activating does
#[test]
fn test_activate_file_from_tree() {
    let mut harness = PanelTestHarness::new(80, 20).unwrap();
    harness.load(web_project()).unwrap();

    harness.send_key(KeyCode::End, KeyModifiers::NONE).unwrap();
    assert_eq!(harness.panel().selection(), Some("src/index.ts"));
    harness.assert_screen_contains(" src/index.ts ");

    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();
    assert_eq!(harness.panel().selection(), Some("README.md"));
    harness.assert_screen_contains(" README.md ");
    harness.assert_screen_contains("1 │ # Demo");
    harness.assert_screen_contains("Showing README.md");
}

/// Collapsing a directory hides its rows but keeps the selection
#[test]
fn test_collapse_directory_keeps_selection() {
    let mut harness = PanelTestHarness::new(80, 20).unwrap();
    harness.load(web_project()).unwrap();

    harness.send_key(KeyCode::Home, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();

    harness.assert_screen_not_contains("Button.tsx");
    harness.assert_screen_contains("▶");
    assert_eq!(harness.panel().selection(), Some("src/index.ts"));
    harness.assert_screen_contains("3 │ render(document.body);");

    harness.send_key(KeyCode::Char('l'), KeyModifiers::NONE).unwrap();
    harness.assert_screen_contains("Button.tsx");
}

/// Ctrl+E closes and reopens the panel without losing state
#[test]
fn test_toggle_panel() {
    let mut harness = PanelTestHarness::new(80, 20).unwrap();
    harness.load(web_project()).unwrap();

    harness
        .send_key(KeyCode::Char('e'), KeyModifiers::CONTROL)
        .unwrap();
    harness.assert_screen_contains("Code panel closed");
    harness.assert_screen_not_contains("Files (5)");

    // Tree keys are inert while closed
    harness.send_key(KeyCode::Char('j'), KeyModifiers::NONE).unwrap();

    harness
        .send_key(KeyCode::Char('e'), KeyModifiers::CONTROL)
        .unwrap();
    harness.assert_screen_contains("Files (5)");
    assert_eq!(harness.panel().selection(), Some("src/index.ts"));
}

/// Copy hands out the raw content, never the numbered rendering
#[test]
fn test_copy_selected_file() {
    let mut harness = PanelTestHarness::new(80, 20).unwrap();
    harness.load(web_project()).unwrap();

    let expected = web_project()[0].content.clone();
    harness.send_key(KeyCode::Char('c'), KeyModifiers::NONE).unwrap();

    assert_eq!(harness.clipboard().contents(), Some(expected.clone()));
    harness.assert_screen_contains(&format!(
        "Copied {} bytes to the clipboard",
        expected.len()
    ));

    // The notice expires
    harness.advance_time(Duration::from_secs(3)).unwrap();
    harness.assert_screen_not_contains("Copied");
}

#[test]
fn test_copy_failure_is_reported() {
    let clipboard =
        MemoryClipboard::failing(ClipboardError::Unavailable("no display".to_string()));
    let mut config = Config::default();
    config.viewer.syntax_highlighting = false;
    let mut harness = PanelTestHarness::with_clipboard(80, 20, config, clipboard).unwrap();
    harness.load(web_project()).unwrap();

    harness.send_key(KeyCode::Char('c'), KeyModifiers::NONE).unwrap();

    harness.assert_screen_contains("Copy failed");
    assert_eq!(harness.panel().selection(), Some("src/index.ts"));
}

#[test]
fn test_copy_without_selection() {
    let mut harness = PanelTestHarness::new(80, 20).unwrap();
    harness.send_key(KeyCode::Char('c'), KeyModifiers::NONE).unwrap();

    harness.assert_screen_contains("Select a file to copy");
    assert_eq!(harness.clipboard().contents(), None);
}

/// Bad and colliding paths are skipped; the rest still loads
#[test]
fn test_skipped_artifacts_are_reported() {
    let mut harness = PanelTestHarness::new(80, 20).unwrap();
    harness
        .load(vec![
            Artifact::new("../escape.py", "x"),
            Artifact::new("lib/util.py", "def f(): pass"),
            Artifact::new("lib", "not a directory"),
            Artifact::new("lib/util.py", "duplicate"),
        ])
        .unwrap();

    assert_eq!(harness.panel().issues().len(), 3);
    assert_eq!(harness.panel().file_count(), 1);
    harness.assert_screen_contains("3 generated files could not be shown");
    harness.assert_screen_contains("util.py");
    harness.assert_screen_contains("1 │ def f(): pass");
}

/// A response with nameless or null-content artifacts still loads the rest
#[test]
fn test_malformed_response_artifacts_are_skipped() {
    let mut harness = PanelTestHarness::new(80, 20).unwrap();
    let response = GenerationResponse::from_json(
        r#"{"final_code": {"artifacts": [
            {"filename": "good.ts", "content": "ok"},
            {"content": "no name"},
            {"filename": "b.ts", "content": null}
        ]}}"#,
    )
    .unwrap();
    harness.panel_mut().load_response(response);
    harness.render().unwrap();

    assert_eq!(harness.panel().file_count(), 2);
    assert_eq!(harness.panel().selection(), Some("good.ts"));
    assert!(matches!(
        harness.panel().issues(),
        [PanelIssue::InvalidArtifactPath { path, .. }] if path.is_empty()
    ));
    harness.assert_screen_contains("1 │ ok");
    harness.assert_screen_contains("b.ts");
}

/// Discarding clears the tree and the viewer
#[test]
fn test_discard_artifacts() {
    let mut harness = PanelTestHarness::new(80, 20).unwrap();
    harness.load(web_project()).unwrap();

    harness.send_key(KeyCode::Char('x'), KeyModifiers::NONE).unwrap();

    harness.assert_screen_contains("No generated files");
    harness.assert_screen_contains("No file selected");
    harness.assert_screen_contains("Generated files discarded");
    assert_eq!(harness.panel().selection(), None);
    assert_eq!(harness.panel().file_count(), 0);
}

/// A new load replaces the previous tree and selection entirely
#[test]
fn test_reload_replaces_everything() {
    let mut harness = PanelTestHarness::new(80, 20).unwrap();
    harness.load(web_project()).unwrap();
    harness.send_key(KeyCode::End, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();

    harness
        .load(vec![Artifact::new("main.rs", "fn main() {}")])
        .unwrap();

    assert_eq!(harness.panel().selection(), Some("main.rs"));
    assert_eq!(harness.panel().epoch(), 2);
    harness.assert_screen_not_contains("README.md");
    harness.assert_screen_contains("1 │ fn main() {}");
}

/// The viewer scrolls within its pane and keeps real line numbers
#[test]
fn test_viewer_scrolling() {
    let mut harness = PanelTestHarness::new(80, 12).unwrap();
    harness.load(vec![long_file("log.txt", 50)]).unwrap();

    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    assert_eq!(harness.panel().focus(), Focus::Viewer);

    harness.send_key(KeyCode::End, KeyModifiers::NONE).unwrap();
    harness.assert_screen_contains("50 │ line 50");
    assert!(harness.find_row(" 1 │ line 1").is_none());

    harness.send_key(KeyCode::Home, KeyModifiers::NONE).unwrap();
    harness.assert_screen_contains(" 1 │ line 1");
}

/// Long trees scroll to keep the cursor row visible
#[test]
fn test_tree_scrolls_with_cursor() {
    let mut harness = PanelTestHarness::new(80, 10).unwrap();
    let artifacts = (0..30)
        .map(|i| Artifact::new(format!("file{i:02}.txt"), format!("content {i}")))
        .collect();
    harness.load(artifacts).unwrap();

    harness.send_key(KeyCode::End, KeyModifiers::NONE).unwrap();
    harness.assert_screen_contains("file29.txt");
    // file00.txt stays in the viewer title, so look at its neighbour
    harness.assert_screen_not_contains("file01.txt");

    harness.send_key(KeyCode::Home, KeyModifiers::NONE).unwrap();
    harness.assert_screen_contains("file01.txt");
}

#[test]
fn test_directories_first_order() {
    let mut config = Config::default();
    config.viewer.syntax_highlighting = false;
    config.panel.sibling_order = SiblingOrder::DirectoriesFirst;
    let mut harness = PanelTestHarness::with_config(80, 20, config).unwrap();
    harness
        .load(vec![
            Artifact::new("README.md", "# x"),
            Artifact::new("src/main.rs", "fn main() {}"),
        ])
        .unwrap();

    let view = harness.panel().file_tree().unwrap();
    assert_eq!(
        outline(view, harness.panel().selection(), 2),
        "src/\n  main.rs\nREADME.md *\n"
    );
    // Selection still follows input order
    assert_eq!(harness.panel().selection(), Some("README.md"));
}
