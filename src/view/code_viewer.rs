//! Code viewer state
//!
//! Holds the artifact shown in the viewer pane, splits its content into
//! numbered rows and tracks vertical scroll. Copying always hands out the raw
//! content, never the numbered rendering.

use crate::model::Artifact;
use std::sync::Arc;

/// One displayed row: 1-based number plus the raw line text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberedLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Split content on `\n` into numbered rows.
///
/// Every part is a row, so empty content is one empty row and a trailing
/// newline yields a final empty row.
pub fn numbered_lines(content: &str) -> impl Iterator<Item = NumberedLine<'_>> {
    content
        .split('\n')
        .enumerate()
        .map(|(index, text)| NumberedLine {
            number: index + 1,
            text,
        })
}

/// Number of rows `numbered_lines` yields for the content
pub fn line_count(content: &str) -> usize {
    content.bytes().filter(|&b| b == b'\n').count() + 1
}

/// Width of the line-number gutter: digits of the largest line number
pub fn gutter_width(line_count: usize) -> usize {
    line_count.max(1).to_string().len()
}

/// Viewer pane state for the current selection
#[derive(Debug, Default)]
pub struct CodeViewer {
    artifact: Option<Arc<Artifact>>,
    line_count: usize,
    scroll_offset: usize,
    viewport_height: usize,
}

impl CodeViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an artifact, or the empty state for None.
    ///
    /// Scroll resets when the shown path changes.
    pub fn set_artifact(&mut self, artifact: Option<Arc<Artifact>>) {
        let same_path = match (&self.artifact, &artifact) {
            (Some(current), Some(next)) => current.path == next.path,
            _ => false,
        };

        self.line_count = artifact
            .as_ref()
            .map(|a| line_count(&a.content))
            .unwrap_or(0);
        self.artifact = artifact;

        if same_path {
            self.clamp_scroll();
        } else {
            self.scroll_offset = 0;
        }
    }

    /// Artifact currently shown
    pub fn artifact(&self) -> Option<&Arc<Artifact>> {
        self.artifact.as_ref()
    }

    /// True when there is nothing to display
    pub fn is_empty_state(&self) -> bool {
        self.artifact.is_none()
    }

    /// Raw content for the copy action
    pub fn copy_text(&self) -> Option<&str> {
        self.artifact.as_deref().map(|a| a.content.as_str())
    }

    /// Number of rows of the shown content (0 in the empty state)
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Gutter width for the shown content
    pub fn gutter_width(&self) -> usize {
        gutter_width(self.line_count)
    }

    /// All rows of the shown content
    pub fn lines(&self) -> Vec<NumberedLine<'_>> {
        self.artifact
            .as_deref()
            .map(|a| numbered_lines(&a.content).collect())
            .unwrap_or_default()
    }

    /// Rows inside the current viewport window
    pub fn visible_lines(&self) -> Vec<NumberedLine<'_>> {
        let Some(artifact) = self.artifact.as_deref() else {
            return Vec::new();
        };
        let height = if self.viewport_height == 0 {
            self.line_count
        } else {
            self.viewport_height
        };
        numbered_lines(&artifact.content)
            .skip(self.scroll_offset)
            .take(height)
            .collect()
    }

    /// Set the viewport height (should be called during rendering)
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        self.clamp_scroll();
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn max_scroll(&self) -> usize {
        self.line_count
            .saturating_sub(self.viewport_height.max(1))
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(rows).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport_height.max(1));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport_height.max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }
}
