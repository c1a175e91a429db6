use rust_i18n::t;

use super::*;
use crate::view::file_tree::TreeIntent;

impl CodePanelController {
    pub fn file_tree_navigate_up(&mut self) {
        if let Some(view) = &mut self.file_tree {
            view.select_prev();
        }
    }

    pub fn file_tree_navigate_down(&mut self) {
        if let Some(view) = &mut self.file_tree {
            view.select_next();
        }
    }

    pub fn file_tree_page_up(&mut self) {
        if let Some(view) = &mut self.file_tree {
            view.select_page_up();
        }
    }

    pub fn file_tree_page_down(&mut self) {
        if let Some(view) = &mut self.file_tree {
            view.select_page_down();
        }
    }

    pub fn file_tree_first(&mut self) {
        if let Some(view) = &mut self.file_tree {
            view.select_first();
        }
    }

    pub fn file_tree_last(&mut self) {
        if let Some(view) = &mut self.file_tree {
            view.select_last();
        }
    }

    /// Expand the directory under the cursor, or step into it if already expanded
    pub fn file_tree_expand(&mut self) {
        if let Some(view) = &mut self.file_tree {
            view.expand_cursor();
        }
    }

    /// Collapse the directory under the cursor, or move to its parent
    pub fn file_tree_collapse(&mut self) {
        if let Some(view) = &mut self.file_tree {
            view.collapse_cursor();
        }
    }

    /// Activate the row under the cursor: toggle a directory or show a file
    pub fn file_tree_activate(&mut self) {
        let Some(intent) = self.file_tree.as_mut().and_then(|view| view.activate_cursor()) else {
            return;
        };
        self.apply_tree_intent(intent);
    }

    /// Apply an intent produced by the tree view
    pub fn apply_tree_intent(&mut self, intent: TreeIntent) {
        match intent {
            TreeIntent::Toggled { id, expanded } => {
                tracing::trace!("{} {}", if expanded { "Expanded" } else { "Collapsed" }, id);
            }
            TreeIntent::SelectFile(artifact) => {
                let name = artifact.file_name().to_string();
                self.set_selection(artifact);
                self.notify(
                    NotificationKind::Info,
                    t!("explorer.opened_file", name = &name).to_string(),
                );
            }
        }
    }
}
