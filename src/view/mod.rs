//! View state for the code panel
//!
//! Everything here is plain state with no terminal dependency: the artifact
//! tree and its navigation, the code viewer, transient notifications and the
//! prompt line. Rendering lives in `crate::ui`.

pub mod code_viewer;
pub mod file_tree;
pub mod notification;
pub mod prompt;
