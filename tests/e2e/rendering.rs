use crate::common::fixtures::{web_project, RESPONSE_JSON};
use crate::common::harness::PanelTestHarness;
use codepanel::config::Config;
use codepanel::model::{Artifact, GenerationResponse};
use codepanel::ui::file_explorer::outline;
use crossterm::event::{KeyCode, KeyModifiers};

fn panel_outline(harness: &PanelTestHarness) -> String {
    let panel = harness.panel();
    let view = panel.file_tree().expect("tree loaded");
    outline(view, panel.selection(), panel.config().panel.indent)
        .trim_end()
        .to_string()
}

#[test]
fn test_outline_of_web_project() {
    let mut harness = PanelTestHarness::new(80, 24).unwrap();
    harness.load(web_project()).unwrap();

    insta::assert_snapshot!(panel_outline(&harness), @r"
src/
  index.ts *
  components/
    Button.tsx
  render.ts
package.json
README.md
");
}

/// Messy paths collapse onto the same directories as their clean forms
#[test]
fn test_outline_normalizes_paths() {
    let mut harness = PanelTestHarness::new(80, 24).unwrap();
    harness
        .load(vec![
            Artifact::new("/app//main.py", "print('hi')"),
            Artifact::new("app/./util.py", ""),
            Artifact::new("app/templates/base.html", "<html></html>"),
        ])
        .unwrap();

    insta::assert_snapshot!(panel_outline(&harness), @r"
app/
  main.py *
  util.py
  templates/
    base.html
");
    // The selection keeps the raw path the artifact was generated with
    assert_eq!(harness.panel().selection(), Some("/app//main.py"));
}

#[test]
fn test_outline_after_collapse_and_select() {
    let mut config = Config::default();
    config.viewer.syntax_highlighting = false;
    config.panel.indent = 4;
    let mut harness = PanelTestHarness::with_config(80, 24, config).unwrap();
    harness
        .panel_mut()
        .load_response(GenerationResponse::from_json(RESPONSE_JSON).unwrap());
    harness.render().unwrap();

    // Collapse app/templates, then open requirements.txt
    harness.panel_mut().select_file("app/templates/index.html").unwrap();
    harness.send_key(KeyCode::Char('h'), KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Char('h'), KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::End, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();

    insta::assert_snapshot!(panel_outline(&harness), @r"
app/
    main.py
    templates/
requirements.txt *
");
}
