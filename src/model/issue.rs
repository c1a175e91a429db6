//! Recoverable conditions raised while building or driving the panel
//!
//! None of these are fatal: the panel keeps whatever state it had and the
//! condition is logged and, where the user triggered it, shown as a notice.

use std::fmt;

/// A non-fatal condition reported by the code panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelIssue {
    /// The artifact path cannot be decomposed into tree segments
    InvalidArtifactPath { path: String, reason: String },
    /// The artifact path clashes with a node claimed by an earlier artifact
    PathCollision { path: String, existing: String },
    /// A selection request named a path absent from the current tree
    UnknownSelectionTarget { path: String },
    /// The copy action could not reach the clipboard
    ClipboardUnavailable { reason: String },
}

impl PanelIssue {
    /// Path of the artifact or selection target involved, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            PanelIssue::InvalidArtifactPath { path, .. }
            | PanelIssue::PathCollision { path, .. }
            | PanelIssue::UnknownSelectionTarget { path } => Some(path),
            PanelIssue::ClipboardUnavailable { .. } => None,
        }
    }

    /// True for issues that caused an artifact to be left out of the tree
    pub fn is_skipped_artifact(&self) -> bool {
        matches!(
            self,
            PanelIssue::InvalidArtifactPath { .. } | PanelIssue::PathCollision { .. }
        )
    }
}

impl fmt::Display for PanelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelIssue::InvalidArtifactPath { path, reason } => {
                write!(f, "Invalid artifact path {path:?}: {reason}")
            }
            PanelIssue::PathCollision { path, existing } => {
                write!(f, "Artifact path {path:?} collides with {existing:?}")
            }
            PanelIssue::UnknownSelectionTarget { path } => {
                write!(f, "No file {path:?} in the current tree")
            }
            PanelIssue::ClipboardUnavailable { reason } => {
                write!(f, "Clipboard unavailable: {reason}")
            }
        }
    }
}

impl std::error::Error for PanelIssue {}
