//! UI rendering modules
//!
//! Rendering reads the controller state and writes nothing back except the
//! viewport heights the panes need for scrolling:
//! - `file_explorer` - artifact tree pane
//! - `code_view` - code viewer pane with line-number gutter
//! - `status_bar` - status bar and prompt line

pub mod code_view;
pub mod file_explorer;
pub mod status_bar;

pub use code_view::CodeViewRenderer;
pub use file_explorer::FileExplorerRenderer;
pub use status_bar::{StatusBarRenderer, StatusInfo};

use crate::app::{CodePanelController, Focus, ResponseSummary};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the whole screen for the current controller state
pub fn render(frame: &mut Frame, panel: &mut CodePanelController) {
    let summary_height = if panel.summary().is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(summary_height),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    if let Some(summary) = panel.summary() {
        render_summary(summary, frame, chunks[0]);
    }

    if panel.is_panel_open() {
        render_panel(frame, panel, chunks[1]);
    } else {
        render_closed(frame, chunks[1]);
    }

    let prompt_focused = panel.focus() == Focus::Prompt;
    StatusBarRenderer::render_prompt(panel.prompt(), frame, chunks[2], prompt_focused);

    let info = StatusInfo {
        file_count: panel.file_count(),
        warning_count: panel.warning_count(),
        generating: panel.is_generating(),
        panel_open: panel.is_panel_open(),
    };
    StatusBarRenderer::render(panel.notification(), info, frame, chunks[3]);
}

fn render_panel(frame: &mut Frame, panel: &mut CodePanelController, area: Rect) {
    let tree_percent = (panel.config().panel.tree_width * 100.0).round() as u16;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(tree_percent),
            Constraint::Percentage(100u16.saturating_sub(tree_percent)),
        ])
        .split(area);

    let focus = panel.focus();
    let indent = panel.config().panel.indent;
    let line_numbers = panel.config().viewer.line_numbers;
    let selection = panel.selection().map(str::to_owned);

    match panel.file_tree_mut() {
        Some(view) => FileExplorerRenderer::render(
            view,
            selection.as_deref(),
            indent,
            frame,
            columns[0],
            focus == Focus::Tree,
        ),
        None => render_no_artifacts(frame, columns[0], focus == Focus::Tree),
    }

    panel
        .viewer_mut()
        .set_viewport_height(CodeViewRenderer::viewport_height(columns[1]));
    let (viewer, rows) = panel.code_view();
    CodeViewRenderer::render(
        viewer,
        rows,
        line_numbers,
        frame,
        columns[1],
        focus == Focus::Viewer,
    );
}

fn render_no_artifacts(frame: &mut Frame, area: Rect, is_focused: bool) {
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let empty = Paragraph::new(Line::from(Span::styled(
        "No generated files",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Files ")
            .border_style(border_style),
    );
    frame.render_widget(empty, area);
}

fn render_closed(frame: &mut Frame, area: Rect) {
    let hint = Paragraph::new(Line::from(Span::styled(
        "Code panel closed. Press Ctrl+E to open it.",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hint, area);
}

fn render_summary(summary: &ResponseSummary, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::raw(
        summary.message.clone().unwrap_or_else(|| "Generation finished".to_string()),
    )];
    if summary.vulnerabilities > 0 {
        spans.push(Span::styled(
            format!("  {} vulnerabilities reported", summary.vulnerabilities),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(first) = summary.recommendations.first() {
        spans.push(Span::styled(
            format!("  Tip: {first}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
