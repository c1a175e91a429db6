//! Syntax highlighting for the code viewer via syntect
//!
//! Highlighting works on the same `\n`-separated rows as the line-number
//! gutter, so row `n` of the highlighted output is always row `n` of the
//! numbered content. It never changes what gets copied.

use crate::model::Artifact;
use once_cell::sync::Lazy;
use ratatui::style::{Color, Modifier, Style};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// One highlighted run of text within a row
pub type StyledSpan = (Style, String);

/// Map language hints and extensions to a token known to the bundled grammars.
///
/// The default grammar set has no TypeScript; JavaScript is close enough for display.
fn syntax_token(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    let token = match lower.as_str() {
        "typescript" | "ts" | "tsx" | "jsx" | "javascript" | "mjs" | "cjs" => "js",
        "python" => "py",
        "rust" => "rs",
        "markdown" => "md",
        "shell" | "bash" | "zsh" => "sh",
        "htm" => "html",
        "yml" => "yaml",
        other => other,
    };
    token.to_string()
}

/// Highlights artifact content with a fixed syntect theme
#[derive(Debug, Clone)]
pub struct CodeHighlighter {
    theme: Theme,
}

impl CodeHighlighter {
    /// Theme by name; unknown names fall back to the default theme
    pub fn new(theme_name: &str) -> Self {
        let theme = THEME_SET
            .themes
            .get(theme_name)
            .or_else(|| {
                tracing::warn!("Unknown syntax theme '{}', using {}", theme_name, DEFAULT_THEME);
                THEME_SET.themes.get(DEFAULT_THEME)
            })
            .cloned()
            .unwrap_or_default();
        Self { theme }
    }

    /// Syntax for an artifact: language hint first, then the extension, then plain text
    pub fn syntax_for(artifact: &Artifact) -> &'static SyntaxReference {
        let by_hint = artifact
            .language
            .as_deref()
            .and_then(|lang| SYNTAX_SET.find_syntax_by_token(&syntax_token(lang)));

        by_hint
            .or_else(|| {
                artifact
                    .extension()
                    .and_then(|ext| SYNTAX_SET.find_syntax_by_extension(&syntax_token(&ext)))
            })
            .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
    }

    /// Highlight every row of the artifact's content
    pub fn highlight(&self, artifact: &Artifact) -> Vec<Vec<StyledSpan>> {
        let syntax = Self::syntax_for(artifact);
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut failed = false;

        artifact
            .content
            .split('\n')
            .map(|row| {
                if failed {
                    return plain_row(row);
                }
                // The newline-aware grammars expect the terminator
                let line = format!("{row}\n");
                match highlighter.highlight_line(&line, &SYNTAX_SET) {
                    Ok(ranges) => ranges
                        .into_iter()
                        .filter_map(|(style, text)| {
                            let text = text.trim_end_matches('\n');
                            (!text.is_empty()).then(|| (convert_style(style), text.to_string()))
                        })
                        .collect(),
                    Err(e) => {
                        tracing::debug!("Highlighting {} failed: {}", artifact.path, e);
                        failed = true;
                        plain_row(row)
                    }
                }
            })
            .collect()
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

fn plain_row(row: &str) -> Vec<StyledSpan> {
    if row.is_empty() {
        Vec::new()
    } else {
        vec![(Style::default(), row.to_string())]
    }
}

/// Foreground and font style only; the panel keeps its own background
fn convert_style(style: syntect::highlighting::Style) -> Style {
    let fg = style.foreground;
    let mut result = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        result = result.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        result = result.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        result = result.add_modifier(Modifier::UNDERLINED);
    }
    result
}
