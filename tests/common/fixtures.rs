// Generated-artifact fixtures

use codepanel::model::Artifact;

/// A small web project: nested directories, mixed languages
pub fn web_project() -> Vec<Artifact> {
    vec![
        Artifact::new(
            "src/index.ts",
            "import { render } from './render';\n\nrender(document.body);\n",
        )
        .with_language("typescript"),
        Artifact::new(
            "src/components/Button.tsx",
            "export const Button = () => <button>Go</button>;",
        ),
        Artifact::new("src/render.ts", "export function render(el) {\n  el.innerHTML = 'hi';\n}"),
        Artifact::new("package.json", "{\n  \"name\": \"demo\"\n}"),
        Artifact::new("README.md", "# Demo\n"),
    ]
}

/// A file with `lines` numbered rows
pub fn long_file(path: &str, lines: usize) -> Artifact {
    let content = (1..=lines)
        .map(|n| format!("line {n}"))
        .collect::<Vec<_>>()
        .join("\n");
    Artifact::new(path, content)
}

/// Response body as the generation endpoint sends it
pub const RESPONSE_JSON: &str = r#"{
  "message": "Generated a Flask app",
  "final_code": {
    "artifacts": [
      {"filename": "app/main.py", "content": "from flask import Flask\napp = Flask(__name__)\n", "language": "python"},
      {"filename": "app/templates/index.html", "content": "<h1>Hello</h1>"},
      {"filename": "requirements.txt", "content": "flask\n"}
    ]
  },
  "auditor_report": {
    "vulnerabilities_found": true,
    "vulnerabilities_list": [{"type": "debug mode"}],
    "recommendations": ["Disable debug mode in production"]
  }
}"#;
