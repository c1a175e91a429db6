use crate::model::FileCategory;
use crate::view::file_tree::{FileTreeView, NodeId, TreeNode};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub struct FileExplorerRenderer;

impl FileExplorerRenderer {
    /// Render the artifact tree in the given frame area
    ///
    /// `selection` is the raw path of the file shown in the viewer; its row is
    /// marked independently of the keyboard cursor.
    pub fn render(
        view: &mut FileTreeView,
        selection: Option<&str>,
        indent_width: usize,
        frame: &mut Frame,
        area: Rect,
        is_focused: bool,
    ) {
        // Account for borders (top + bottom = 2)
        let viewport_height = area.height.saturating_sub(2) as usize;
        view.set_viewport_height(viewport_height);

        let display_nodes = view.get_display_nodes();
        let cursor_index = view.get_cursor_index();
        let scroll_offset = view.get_scroll_offset().min(display_nodes.len());

        // Only the visible window is handed to the List so it never scrolls on its own
        let visible_end = (scroll_offset + viewport_height).min(display_nodes.len());
        let content_width = area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = display_nodes[scroll_offset..visible_end]
            .iter()
            .filter_map(|&(node_id, depth)| {
                Self::render_node(view, node_id, depth, indent_width, selection, content_width)
            })
            .collect();

        let title = format!(" Files ({}) ", view.tree().file_count());
        let border_style = if is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(border_style),
            )
            .highlight_style(if is_focused {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default().bg(Color::Black)
            });

        let mut list_state = ListState::default();
        if let Some(cursor) = cursor_index {
            if cursor >= scroll_offset && cursor < visible_end {
                list_state.select(Some(cursor - scroll_offset));
            }
        }

        frame.render_stateful_widget(list, area, &mut list_state);
    }

    /// Render a single tree node as a ListItem
    fn render_node(
        view: &FileTreeView,
        node_id: NodeId,
        depth: usize,
        indent_width: usize,
        selection: Option<&str>,
        content_width: usize,
    ) -> Option<ListItem<'static>> {
        let node = view.tree().get_node(node_id)?;
        let is_selected = is_selected_file(node, selection);

        let mut spans = Vec::new();
        spans.push(Span::raw(" ".repeat(depth * indent_width)));

        if node.is_dir() {
            let indicator = if view.is_expanded(node_id) { "▼ " } else { "▶ " };
            spans.push(Span::styled(indicator, Style::default().fg(Color::Yellow)));
        } else {
            spans.push(Span::raw("  "));
        }

        spans.push(Span::raw(format!("{} ", get_icon(node))));

        let used: usize = spans.iter().map(|span| span.content.width()).sum();
        let name = truncate_to_width(&node.name, content_width.saturating_sub(used));
        let name_style = if node.is_dir() {
            Style::default().fg(Color::Cyan)
        } else if is_selected {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(name, name_style));

        Some(ListItem::new(Line::from(spans)))
    }
}

/// True for the file node whose artifact is the current selection
fn is_selected_file(node: &TreeNode, selection: Option<&str>) -> bool {
    match (node.artifact(), selection) {
        (Some(artifact), Some(path)) => artifact.path == path,
        _ => false,
    }
}

/// Get an icon for a node based on its kind and file category
pub fn get_icon(node: &TreeNode) -> &'static str {
    match node.artifact() {
        None => "📁",
        Some(artifact) => category_icon(artifact.category()),
    }
}

fn category_icon(category: FileCategory) -> &'static str {
    match category {
        FileCategory::Rust => "🦀",
        FileCategory::Python => "🐍",
        FileCategory::Script => "📜",
        FileCategory::Html => "🌐",
        FileCategory::Css => "🎨",
        FileCategory::Json => "⚙️",
        FileCategory::Markdown => "📝",
        FileCategory::Other => "📄",
    }
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let char_width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + char_width + 1 > max_width {
            break;
        }
        out.push(c);
        width += char_width;
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}

/// Plain-text outline of the visible tree.
///
/// Directories end with `/`, the selected file is marked with `*`. Used by
/// `--print-tree` and by tests.
pub fn outline(view: &FileTreeView, selection: Option<&str>, indent_width: usize) -> String {
    let mut out = String::new();
    for (node_id, depth) in view.get_display_nodes() {
        let Some(node) = view.tree().get_node(node_id) else {
            continue;
        };
        out.push_str(&" ".repeat(depth * indent_width));
        out.push_str(&node.name);
        if node.is_dir() {
            out.push('/');
        } else if is_selected_file(node, selection) {
            out.push_str(" *");
        }
        out.push('\n');
    }
    out
}
