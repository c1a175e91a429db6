//! Code viewer rendering: line-number gutter plus highlighted or plain rows

use crate::primitives::highlight::StyledSpan;
use crate::view::code_viewer::{CodeViewer, NumberedLine};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const TAB: &str = "    ";

pub struct CodeViewRenderer;

impl CodeViewRenderer {
    /// Viewport height available for rows inside `area`
    pub fn viewport_height(area: Rect) -> usize {
        area.height.saturating_sub(2) as usize
    }

    /// Render the viewer pane.
    ///
    /// `rows` are the highlighted rows of the whole artifact, indexed by line;
    /// without them the raw text is shown unstyled.
    pub fn render(
        viewer: &CodeViewer,
        rows: Option<&[Vec<StyledSpan>]>,
        line_numbers: bool,
        frame: &mut Frame,
        area: Rect,
        is_focused: bool,
    ) {
        let border_style = if is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title = match viewer.artifact() {
            Some(artifact) => format!(" {} ", artifact.path),
            None => " Code ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style);

        if viewer.is_empty_state() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No file selected",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let gutter_width = viewer.gutter_width();
        let lines: Vec<Line> = viewer
            .visible_lines()
            .into_iter()
            .map(|line| {
                let highlighted = rows.and_then(|rows| rows.get(line.number - 1));
                render_line(line, highlighted, line_numbers.then_some(gutter_width))
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn render_line(
    line: NumberedLine<'_>,
    highlighted: Option<&Vec<StyledSpan>>,
    gutter_width: Option<usize>,
) -> Line<'static> {
    let mut spans = Vec::new();
    if let Some(width) = gutter_width {
        spans.push(Span::styled(
            format!("{:>width$} │ ", line.number, width = width),
            Style::default().fg(Color::DarkGray),
        ));
    }

    match highlighted {
        Some(styled) => spans.extend(
            styled
                .iter()
                .map(|(style, text)| Span::styled(text.replace('\t', TAB), *style)),
        ),
        None => spans.push(Span::raw(line.text.replace('\t', TAB))),
    }

    Line::from(spans)
}
