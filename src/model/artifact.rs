//! Generated source artifacts
//!
//! An artifact is one file produced by the code-generation endpoint: a
//! `/`-separated path, its full text, and an optional language hint used only
//! for display.

use serde::{Deserialize, Deserializer, Serialize};

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Forward-slash separated path (`src/components/Button.tsx`).
    ///
    /// The generation endpoint calls this field `filename`.
    ///
    /// A missing or null name becomes `""`, which the tree builder rejects as
    /// an invalid path instead of failing the whole response.
    #[serde(
        rename = "filename",
        alias = "path",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub path: String,

    /// Full file text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,

    /// Optional language hint ("ts", "py", ...). Display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Artifact {
    /// Create an artifact without a language hint
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            language: None,
        }
    }

    /// Attach a language hint
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Last path segment, or the whole path if it has no separator
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit('/')
            .find(|segment| !segment.trim().is_empty())
            .unwrap_or(&self.path)
    }

    /// Lowercased extension of the file name, if any
    pub fn extension(&self) -> Option<String> {
        extension_of(self.file_name())
    }

    /// Display category, preferring the language hint over the extension
    pub fn category(&self) -> FileCategory {
        self.language
            .as_deref()
            .and_then(FileCategory::from_language)
            .or_else(|| self.extension().map(|ext| FileCategory::from_extension(&ext)))
            .unwrap_or(FileCategory::Other)
    }
}

/// Lowercased extension of a file name (`Button.tsx` -> `tsx`).
///
/// Dotfiles without a further dot (`.env`) have no extension.
pub fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Display category of a generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// JavaScript / TypeScript sources
    Script,
    Json,
    Markdown,
    Html,
    Css,
    Python,
    Rust,
    Other,
}

impl FileCategory {
    /// Category for a lowercased file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => FileCategory::Script,
            "json" => FileCategory::Json,
            "md" | "markdown" => FileCategory::Markdown,
            "html" | "htm" => FileCategory::Html,
            "css" | "scss" | "sass" => FileCategory::Css,
            "py" => FileCategory::Python,
            "rs" => FileCategory::Rust,
            _ => FileCategory::Other,
        }
    }

    /// Category for a language hint, accepting both names and extensions
    pub fn from_language(language: &str) -> Option<Self> {
        let lowered = language.trim().to_lowercase();
        let category = match lowered.as_str() {
            "" => return None,
            "javascript" | "typescript" | "jsx" | "tsx" => FileCategory::Script,
            "python" => FileCategory::Python,
            "rust" => FileCategory::Rust,
            "markdown" => FileCategory::Markdown,
            other => FileCategory::from_extension(other),
        };
        match category {
            FileCategory::Other => None,
            known => Some(known),
        }
    }
}
