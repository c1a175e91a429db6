use super::node::NodeId;
use super::tree::ArtifactTree;
use crate::model::Artifact;
use std::collections::HashSet;
use std::sync::Arc;

/// Outcome of activating a row in the tree
#[derive(Debug, Clone)]
pub enum TreeIntent {
    /// A directory was expanded or collapsed
    Toggled { id: NodeId, expanded: bool },
    /// A file was chosen; carries its full path and content
    SelectFile(Arc<Artifact>),
}

/// View state for artifact tree navigation
///
/// Owns the expansion state of one tree build. Every directory starts
/// expanded; the state lives until the tree is replaced.
#[derive(Debug)]
pub struct FileTreeView {
    /// The underlying tree model
    tree: ArtifactTree,
    /// Directories currently expanded
    expanded: HashSet<NodeId>,
    /// Row focused by keyboard navigation (not the file selection)
    cursor: Option<NodeId>,
    /// Scroll offset (index into visible nodes)
    scroll_offset: usize,
    /// Last known viewport height (for scrolling calculations)
    pub(crate) viewport_height: usize,
}

impl FileTreeView {
    /// Create a new view with every directory expanded
    pub fn new(tree: ArtifactTree) -> Self {
        let expanded = tree.directory_ids().collect();
        let cursor = tree.children(tree.root_id()).first().copied();
        Self {
            tree,
            expanded,
            cursor,
            scroll_offset: 0,
            viewport_height: 10, // Default, will be updated during rendering
        }
    }

    /// Set the viewport height (should be called during rendering)
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
    }

    /// Get the underlying tree
    pub fn tree(&self) -> &ArtifactTree {
        &self.tree
    }

    /// Directories currently expanded
    pub fn expanded(&self) -> &HashSet<NodeId> {
        &self.expanded
    }

    /// Check if a directory is expanded
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    /// Get currently visible nodes with their indent levels
    ///
    /// Returns a list of (NodeId, indent_level) tuples for rendering.
    pub fn get_display_nodes(&self) -> Vec<(NodeId, usize)> {
        self.tree.get_visible_nodes(&self.expanded)
    }

    /// Expand a directory; no-op for files and unknown IDs
    pub fn expand(&mut self, id: NodeId) -> bool {
        match self.tree.get_node(id) {
            Some(node) if node.is_dir() => self.expanded.insert(id),
            _ => false,
        }
    }

    /// Collapse a directory, moving the cursor out of it if needed
    pub fn collapse(&mut self, id: NodeId) -> bool {
        if !self.expanded.remove(&id) {
            return false;
        }
        if let Some(cursor) = self.cursor {
            if self.tree.ancestors(cursor).contains(&id) {
                self.cursor = Some(id);
            }
        }
        self.ensure_visible(self.viewport_height);
        true
    }

    /// Toggle a directory, returning its new expansion state
    pub fn toggle(&mut self, id: NodeId) -> Option<bool> {
        let node = self.tree.get_node(id)?;
        if !node.is_dir() {
            return None;
        }

        if self.is_expanded(id) {
            self.collapse(id);
            Some(false)
        } else {
            self.expand(id);
            Some(true)
        }
    }

    /// Activate a row: directories toggle, files produce a selection intent
    pub fn activate(&mut self, id: NodeId) -> Option<TreeIntent> {
        let node = self.tree.get_node(id)?;
        if let Some(artifact) = node.artifact() {
            let artifact = artifact.clone();
            self.cursor = Some(id);
            return Some(TreeIntent::SelectFile(artifact));
        }

        let expanded = self.toggle(id)?;
        Some(TreeIntent::Toggled { id, expanded })
    }

    /// Activate the row under the cursor
    pub fn activate_cursor(&mut self) -> Option<TreeIntent> {
        let cursor = self.cursor?;
        self.activate(cursor)
    }

    /// Right-arrow behavior: expand a collapsed directory, else step into it
    pub fn expand_cursor(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let Some(node) = self.tree.get_node(cursor) else {
            return;
        };
        if !node.is_dir() {
            return;
        }

        if self.is_expanded(cursor) {
            if let Some(&first) = node.children().first() {
                self.cursor = Some(first);
            }
        } else {
            self.expand(cursor);
        }
    }

    /// Left-arrow behavior: collapse an expanded directory, else go to parent
    pub fn collapse_cursor(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };
        if self.is_expanded(cursor) {
            self.collapse(cursor);
        } else {
            self.select_parent();
        }
    }

    /// Expand every directory
    pub fn expand_all(&mut self) {
        self.expanded = self.tree.directory_ids().collect();
    }

    /// Collapse every directory
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        if let Some(cursor) = self.cursor {
            self.cursor = self.tree.ancestors(cursor).first().copied().or(Some(cursor));
        }
        self.ensure_visible(self.viewport_height);
    }

    /// Get the row under the cursor
    pub fn get_cursor(&self) -> Option<NodeId> {
        self.cursor
    }

    /// Set the cursor row
    pub fn set_cursor(&mut self, node_id: Option<NodeId>) {
        self.cursor = node_id;
    }

    fn visible_ids(&self) -> Vec<NodeId> {
        self.get_display_nodes()
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }

    /// Move the cursor to the next visible row
    pub fn select_next(&mut self) {
        self.move_cursor_by(1);
    }

    /// Move the cursor to the previous visible row
    pub fn select_prev(&mut self) {
        self.move_cursor_by(-1);
    }

    /// Move the cursor up by a page (viewport height)
    pub fn select_page_up(&mut self) {
        if self.viewport_height == 0 {
            return;
        }
        self.move_cursor_by(-(self.viewport_height as isize));
    }

    /// Move the cursor down by a page (viewport height)
    pub fn select_page_down(&mut self) {
        if self.viewport_height == 0 {
            return;
        }
        self.move_cursor_by(self.viewport_height as isize);
    }

    fn move_cursor_by(&mut self, delta: isize) {
        let visible = self.visible_ids();
        if visible.is_empty() {
            return;
        }

        let current = self
            .cursor
            .and_then(|cursor| visible.iter().position(|&id| id == cursor));
        let new_pos = match current {
            Some(pos) => pos
                .saturating_add_signed(delta)
                .min(visible.len() - 1),
            None => 0,
        };
        self.cursor = Some(visible[new_pos]);
        self.ensure_visible(self.viewport_height);
    }

    /// Move the cursor to the first visible row
    pub fn select_first(&mut self) {
        if let Some(&first) = self.visible_ids().first() {
            self.cursor = Some(first);
            self.ensure_visible(self.viewport_height);
        }
    }

    /// Move the cursor to the last visible row
    pub fn select_last(&mut self) {
        if let Some(&last) = self.visible_ids().last() {
            self.cursor = Some(last);
            self.ensure_visible(self.viewport_height);
        }
    }

    /// Move the cursor to the parent directory of the current row
    pub fn select_parent(&mut self) {
        if let Some(current) = self.cursor {
            if let Some(parent_id) = self.tree.ancestors(current).last() {
                self.cursor = Some(*parent_id);
                self.ensure_visible(self.viewport_height);
            }
        }
    }

    /// Expand all parent directories of a file and move the cursor to it.
    ///
    /// Returns false if the path names no file in the tree.
    pub fn reveal(&mut self, path: &str) -> bool {
        let Some(id) = self.tree.get_file_by_path(path).map(|node| node.id) else {
            return false;
        };
        for ancestor in self.tree.ancestors(id) {
            self.expanded.insert(ancestor);
        }
        self.cursor = Some(id);
        self.ensure_visible(self.viewport_height);
        true
    }

    /// Get the scroll offset
    pub fn get_scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Ensure the cursor row is visible within the viewport
    ///
    /// Adjusts scroll offset if necessary to keep the cursor visible.
    pub fn ensure_visible(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        if let Some(pos) = self.get_cursor_index() {
            // If cursor is above viewport, scroll up
            if pos < self.scroll_offset {
                self.scroll_offset = pos;
            }
            // If cursor is below viewport, scroll down
            else if pos >= self.scroll_offset + viewport_height {
                self.scroll_offset = pos - viewport_height + 1;
            }
        }
    }

    /// Get the index of the cursor row in the visible list
    pub fn get_cursor_index(&self) -> Option<usize> {
        let cursor = self.cursor?;
        self.visible_ids().iter().position(|&id| id == cursor)
    }

    /// Get visible node at index
    pub fn get_node_at_index(&self, index: usize) -> Option<NodeId> {
        self.visible_ids().get(index).copied()
    }

    /// Get the number of visible nodes
    pub fn visible_count(&self) -> usize {
        self.get_display_nodes().len()
    }
}
