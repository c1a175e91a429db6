use super::node::{NodeId, NodeKind, TreeNode};
use crate::model::{Artifact, PanelIssue};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Display order of siblings within a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiblingOrder {
    /// Order of first appearance among the input artifacts
    #[default]
    Insertion,
    /// Directories before files, first-appearance order within each group
    DirectoriesFirst,
}

/// Directory hierarchy reconstructed from a flat artifact list
///
/// Nodes live in an arena indexed by `NodeId`. The root is an implicit,
/// unnamed directory whose children are the top-level path segments.
#[derive(Debug, Clone)]
pub struct ArtifactTree {
    /// All nodes indexed by ID
    nodes: Vec<TreeNode>,
    /// Normalized path to node ID mapping for quick lookups
    path_to_node: HashMap<String, NodeId>,
    /// Root node ID
    root_id: NodeId,
    /// Number of file nodes
    file_count: usize,
}

/// Result of building a tree: the tree plus every artifact that was skipped
#[derive(Debug, Clone)]
pub struct TreeBuild {
    pub tree: ArtifactTree,
    pub issues: Vec<PanelIssue>,
}

/// Split a path into tree segments.
///
/// Empty, whitespace-only and `.` segments collapse, so `a//b`, `/a/b` and
/// `a/./b` all yield `["a", "b"]`. A `..` segment or a path with no segments
/// left is rejected with the reason.
pub fn split_segments(path: &str) -> Result<Vec<&str>, String> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        if segment.trim().is_empty() || segment == "." {
            continue;
        }
        if segment == ".." {
            return Err("parent directory segments are not allowed".to_string());
        }
        segments.push(segment);
    }

    if segments.is_empty() {
        return Err("path has no segments".to_string());
    }
    Ok(segments)
}

/// Canonical `/`-joined form of a path, or None if it cannot be split
pub fn normalize_path(path: &str) -> Option<String> {
    split_segments(path).ok().map(|segments| segments.join("/"))
}

impl ArtifactTree {
    /// Create a tree holding only the implicit root
    pub fn empty() -> Self {
        let root_id = NodeId(0);
        let mut path_to_node = HashMap::new();
        path_to_node.insert(String::new(), root_id);

        Self {
            nodes: vec![TreeNode::directory(root_id, String::new(), String::new(), None)],
            path_to_node,
            root_id,
            file_count: 0,
        }
    }

    /// Build a tree from artifacts in input order.
    ///
    /// Artifacts whose path is invalid or clashes with a node claimed by an
    /// earlier artifact are skipped and reported; nodes are never overwritten.
    pub fn build<I>(artifacts: I, order: SiblingOrder) -> TreeBuild
    where
        I: IntoIterator<Item = Arc<Artifact>>,
    {
        let mut tree = Self::empty();
        let mut issues = Vec::new();

        for artifact in artifacts {
            if let Err(issue) = tree.insert(artifact) {
                issues.push(issue);
            }
        }

        if order == SiblingOrder::DirectoriesFirst {
            tree.sort_directories_first();
        }

        TreeBuild { tree, issues }
    }

    /// Convenience wrapper over `build` for borrowed artifacts
    pub fn build_from(artifacts: &[Artifact], order: SiblingOrder) -> TreeBuild {
        Self::build(artifacts.iter().cloned().map(Arc::new), order)
    }

    /// Insert one artifact, creating intermediate directories as needed
    fn insert(&mut self, artifact: Arc<Artifact>) -> Result<NodeId, PanelIssue> {
        let segments =
            split_segments(&artifact.path).map_err(|reason| PanelIssue::InvalidArtifactPath {
                path: artifact.path.clone(),
                reason,
            })?;
        let Some((file_name, dirs)) = segments.split_last() else {
            return Err(PanelIssue::InvalidArtifactPath {
                path: artifact.path.clone(),
                reason: "path has no segments".to_string(),
            });
        };

        let mut parent = self.root_id;
        let mut prefix = String::new();

        for segment in dirs {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            parent = match self.path_to_node.get(&prefix).copied() {
                Some(existing) if self.nodes[existing.0].is_dir() => existing,
                Some(_) => {
                    return Err(PanelIssue::PathCollision {
                        path: artifact.path.clone(),
                        existing: prefix,
                    });
                }
                None => {
                    let node = TreeNode::directory(
                        NodeId(self.nodes.len()),
                        segment.to_string(),
                        prefix.clone(),
                        Some(parent),
                    );
                    self.add_node(node)
                }
            };
        }

        let full_path = if prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{prefix}/{file_name}")
        };

        if self.path_to_node.contains_key(&full_path) {
            return Err(PanelIssue::PathCollision {
                path: artifact.path.clone(),
                existing: full_path,
            });
        }

        let node = TreeNode::file(
            NodeId(self.nodes.len()),
            file_name.to_string(),
            full_path,
            Some(parent),
            artifact,
        );
        self.file_count += 1;
        Ok(self.add_node(node))
    }

    /// Append a node to the arena and link it under its parent
    fn add_node(&mut self, node: TreeNode) -> NodeId {
        let id = node.id;
        let parent = node.parent;
        self.path_to_node.insert(node.path.clone(), id);
        self.nodes.push(node);

        if let Some(parent_id) = parent {
            if let Some(children) = self.nodes[parent_id.0].children_mut() {
                children.push(id);
            }
        }
        id
    }

    fn sort_directories_first(&mut self) {
        let is_dir: Vec<bool> = self.nodes.iter().map(TreeNode::is_dir).collect();
        for node in &mut self.nodes {
            if let Some(children) = node.children_mut() {
                // Stable: keeps first-appearance order inside each group
                children.sort_by_key(|child| !is_dir[child.0]);
            }
        }
    }

    /// Get the root node ID
    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Get a node by path; the path is normalized before lookup
    pub fn get_node_by_path(&self, path: &str) -> Option<&TreeNode> {
        let normalized = normalize_path(path)?;
        self.path_to_node
            .get(&normalized)
            .and_then(|id| self.get_node(*id))
    }

    /// Get the file node for a path, ignoring directories
    pub fn get_file_by_path(&self, path: &str) -> Option<&TreeNode> {
        self.get_node_by_path(path).filter(|node| node.is_file())
    }

    /// Get all nodes, root included
    pub fn all_nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// Children of a node in display order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get_node(id).map(TreeNode::children).unwrap_or(&[])
    }

    /// Number of file nodes
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// True when the tree holds no files
    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }

    /// IDs of every directory below the root
    pub fn directory_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|node| node.is_dir() && node.id != self.root_id)
            .map(|node| node.id)
    }

    /// Artifacts of all file nodes in depth-first display order
    pub fn file_entries(&self) -> Vec<&Arc<Artifact>> {
        let mut files = Vec::with_capacity(self.file_count);
        self.collect_files_recursive(self.root_id, &mut files);
        files
    }

    fn collect_files_recursive<'a>(&'a self, id: NodeId, files: &mut Vec<&'a Arc<Artifact>>) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::File(artifact) => files.push(artifact),
            NodeKind::Directory(children) => {
                for &child in children {
                    self.collect_files_recursive(child, files);
                }
            }
        }
    }

    /// Get the depth of a node (top-level entries have depth 0)
    pub fn get_depth(&self, id: NodeId) -> usize {
        self.get_node(id)
            .map(|node| {
                node.depth(|parent| self.get_node(parent).and_then(|n| n.parent))
                    .saturating_sub(1)
            })
            .unwrap_or(0)
    }

    /// IDs of the directories enclosing a node, outermost first (root excluded)
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.get_node(id).and_then(|node| node.parent);

        while let Some(parent_id) = current {
            if parent_id == self.root_id {
                break;
            }
            ancestors.push(parent_id);
            current = self.get_node(parent_id).and_then(|node| node.parent);
        }

        ancestors.reverse();
        ancestors
    }

    /// Get all visible nodes in tree order with their depth
    ///
    /// Returns a flat list of nodes that should be visible, respecting
    /// the expansion state of parent directories. The root is not listed.
    pub fn get_visible_nodes(&self, expanded: &HashSet<NodeId>) -> Vec<(NodeId, usize)> {
        let mut visible = Vec::new();
        for &child in self.children(self.root_id) {
            self.collect_visible_recursive(child, 0, expanded, &mut visible);
        }
        visible
    }

    /// Recursively collect visible nodes
    fn collect_visible_recursive(
        &self,
        id: NodeId,
        depth: usize,
        expanded: &HashSet<NodeId>,
        visible: &mut Vec<(NodeId, usize)>,
    ) {
        visible.push((id, depth));

        if expanded.contains(&id) {
            for &child_id in self.children(id) {
                self.collect_visible_recursive(child_id, depth + 1, expanded, visible);
            }
        }
    }
}

impl Default for ArtifactTree {
    fn default() -> Self {
        Self::empty()
    }
}
