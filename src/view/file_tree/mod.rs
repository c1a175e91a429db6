// Artifact tree module
//
// This module rebuilds a directory hierarchy from the flat list of generated
// files and keeps the per-tree navigation state (expanded directories,
// cursor, scroll).

pub mod node;
pub mod tree;
pub mod view;

pub use node::{NodeId, NodeKind, TreeNode};
pub use tree::{normalize_path, split_segments, ArtifactTree, SiblingOrder, TreeBuild};
pub use view::{FileTreeView, TreeIntent};
