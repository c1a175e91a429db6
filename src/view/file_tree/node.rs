use crate::model::Artifact;
use std::fmt;
use std::sync::Arc;

/// Unique identifier for a tree node within one build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Represents a node in the artifact tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Unique identifier
    pub id: NodeId,
    /// Path segment shown for this node (empty for the root)
    pub name: String,
    /// Normalized full path from the root (empty for the root)
    pub path: String,
    /// Parent node ID (None for root)
    pub parent: Option<NodeId>,
    /// What the node holds
    pub kind: NodeKind,
}

/// File or directory payload of a node
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Terminal node holding its artifact
    File(Arc<Artifact>),
    /// Child node IDs in first-insertion order
    Directory(Vec<NodeId>),
}

impl TreeNode {
    /// Create a new directory node with no children
    pub fn directory(id: NodeId, name: String, path: String, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name,
            path,
            parent,
            kind: NodeKind::Directory(Vec::new()),
        }
    }

    /// Create a new file node
    pub fn file(
        id: NodeId,
        name: String,
        path: String,
        parent: Option<NodeId>,
        artifact: Arc<Artifact>,
    ) -> Self {
        Self {
            id,
            name,
            path,
            parent,
            kind: NodeKind::File(artifact),
        }
    }

    /// Check if this node is a directory
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory(_))
    }

    /// Check if this node is a file
    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File(_))
    }

    /// Artifact held by a file node
    pub fn artifact(&self) -> Option<&Arc<Artifact>> {
        match &self.kind {
            NodeKind::File(artifact) => Some(artifact),
            NodeKind::Directory(_) => None,
        }
    }

    /// Child IDs of a directory node (empty for files)
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Directory(children) => children,
            NodeKind::File(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.kind {
            NodeKind::Directory(children) => Some(children),
            NodeKind::File(_) => None,
        }
    }

    /// Get the depth of this node in the tree
    pub fn depth(&self, get_parent: impl Fn(NodeId) -> Option<NodeId>) -> usize {
        let mut depth = 0;
        let mut current = self.parent;

        while let Some(parent_id) = current {
            depth += 1;
            current = get_parent(parent_id);
        }

        depth
    }
}
