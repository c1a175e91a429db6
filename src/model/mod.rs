//! Data model for generated artifacts
//!
//! Pure data with no terminal or I/O dependencies.

pub mod artifact;
pub mod generation;
pub mod issue;

pub use artifact::{Artifact, FileCategory};
pub use generation::{GenerateRequest, GenerationResponse};
pub use issue::PanelIssue;
