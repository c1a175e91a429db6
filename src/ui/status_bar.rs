//! Status bar and prompt line rendering

use crate::view::notification::{Notification, NotificationKind};
use crate::view::prompt::PromptInput;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Facts shown on the right side of the status bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusInfo {
    pub file_count: usize,
    pub warning_count: usize,
    pub generating: bool,
    pub panel_open: bool,
}

impl StatusInfo {
    fn right_text(&self) -> String {
        let mut parts = Vec::new();
        if self.generating {
            parts.push("generating…".to_string());
        }
        if self.warning_count > 0 {
            parts.push(format!("⚠ {}", self.warning_count));
        }
        parts.push(match self.file_count {
            1 => "1 file".to_string(),
            n => format!("{n} files"),
        });
        if !self.panel_open {
            parts.push("closed".to_string());
        }
        format!(" {} ", parts.join(" | "))
    }
}

pub struct StatusBarRenderer;

impl StatusBarRenderer {
    /// Render the status bar: the current notification on the left, panel
    /// facts on the right
    pub fn render(
        notification: Option<&Notification>,
        info: StatusInfo,
        frame: &mut Frame,
        area: Rect,
    ) {
        let base = Style::default().fg(Color::Black).bg(Color::Gray);
        let (left, left_style) = match notification {
            Some(n) => (format!(" {}", n.message), notification_style(n.kind, base)),
            None => (" Ctrl+E panel | Tab focus | c copy | p prompt | q quit".to_string(), base),
        };
        let right = info.right_text();

        let width = area.width as usize;
        let right_width = right.width();
        let left = fit(&left, width.saturating_sub(right_width));
        let padding = width.saturating_sub(left.width() + right_width);

        let line = Line::from(vec![
            Span::styled(left, left_style),
            Span::styled(" ".repeat(padding), base),
            Span::styled(right, base),
        ]);
        frame.render_widget(Paragraph::new(line).style(base), area);
    }

    /// Render the prompt line; places the terminal cursor when focused
    pub fn render_prompt(prompt: &PromptInput, frame: &mut Frame, area: Rect, is_focused: bool) {
        let label_style = if is_focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text = if prompt.text().is_empty() && !is_focused {
            Span::styled("press p to describe what to generate", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(prompt.text().to_string())
        };
        let line = Line::from(vec![Span::styled("Prompt: ", label_style), text]);
        frame.render_widget(Paragraph::new(line), area);

        if is_focused {
            let offset = "Prompt: ".width() + prompt.text()[..prompt.cursor()].width();
            let x = area.x + (offset as u16).min(area.width.saturating_sub(1));
            frame.set_cursor_position((x, area.y));
        }
    }
}

fn notification_style(kind: NotificationKind, base: Style) -> Style {
    match kind {
        NotificationKind::Success => base.fg(Color::Green).bg(Color::Black),
        NotificationKind::Failure => base.fg(Color::White).bg(Color::Red),
        NotificationKind::Info => base,
    }
}

/// Cut `text` to at most `width` columns
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out
}
