//! Key bindings: crossterm key events to panel actions
//!
//! Bindings are resolved in order: global chords (work in every context,
//! including the prompt), then the prompt's text editing keys, then the
//! panel-wide single keys, then the focused pane's navigation keys.

use super::{Action, KeyContext};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Resolve a key event in `context` to an action
pub fn resolve(event: &KeyEvent, context: KeyContext) -> Option<Action> {
    if let Some(action) = resolve_global(event) {
        return Some(action);
    }

    if context.allows_text_input() {
        return resolve_prompt(event);
    }

    // Remaining bindings are plain keys; Shift only matters through the char itself
    if event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    if let Some(action) = resolve_panel(event) {
        return Some(action);
    }

    match context {
        KeyContext::FileTree => resolve_file_tree(event),
        KeyContext::CodeViewer => resolve_viewer(event),
        KeyContext::Prompt | KeyContext::Closed => None,
    }
}

fn resolve_global(event: &KeyEvent) -> Option<Action> {
    if !event.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match event.code {
        KeyCode::Char('c') => Some(Action::Quit),
        KeyCode::Char('e') => Some(Action::TogglePanel),
        _ => None,
    }
}

fn resolve_prompt(event: &KeyEvent) -> Option<Action> {
    match event.code {
        KeyCode::Enter => Some(Action::PromptSubmit),
        KeyCode::Esc => Some(Action::PromptCancel),
        KeyCode::Backspace => Some(Action::PromptBackspace),
        KeyCode::Left => Some(Action::PromptLeft),
        KeyCode::Right => Some(Action::PromptRight),
        KeyCode::Char(c)
            if !event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(Action::PromptInsert(c))
        }
        _ => None,
    }
}

fn resolve_panel(event: &KeyEvent) -> Option<Action> {
    match event.code {
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::Char('c') => Some(Action::CopySelection),
        KeyCode::Char('p') => Some(Action::OpenPrompt),
        KeyCode::Char('x') => Some(Action::DiscardArtifacts),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

fn resolve_file_tree(event: &KeyEvent) -> Option<Action> {
    match event.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::FileTreeUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::FileTreeDown),
        KeyCode::PageUp => Some(Action::FileTreePageUp),
        KeyCode::PageDown => Some(Action::FileTreePageDown),
        KeyCode::Home => Some(Action::FileTreeFirst),
        KeyCode::End => Some(Action::FileTreeLast),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::FileTreeExpand),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::FileTreeCollapse),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::FileTreeActivate),
        _ => None,
    }
}

fn resolve_viewer(event: &KeyEvent) -> Option<Action> {
    match event.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ViewerScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ViewerScrollDown),
        KeyCode::PageUp => Some(Action::ViewerPageUp),
        KeyCode::PageDown => Some(Action::ViewerPageDown),
        KeyCode::Home => Some(Action::ViewerTop),
        KeyCode::End => Some(Action::ViewerBottom),
        _ => None,
    }
}
