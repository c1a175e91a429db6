use crate::view::file_tree::SiblingOrder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub panel: PanelConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Code panel layout and behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Width of the file tree as a fraction of the panel (0.0 to 1.0]
    #[serde(default = "default_tree_width")]
    pub tree_width: f32,

    /// Columns of indentation per tree depth
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Display order of siblings in the tree
    #[serde(default)]
    pub sibling_order: SiblingOrder,

    /// Whether the panel is visible at startup
    #[serde(default = "default_true")]
    pub start_open: bool,

    /// Open the panel whenever a non-empty artifact list arrives
    #[serde(default = "default_true")]
    pub open_on_load: bool,
}

fn default_tree_width() -> f32 {
    0.3 // 30% of the panel
}

fn default_indent() -> usize {
    2
}

fn default_true() -> bool {
    true
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            tree_width: default_tree_width(),
            indent: default_indent(),
            sibling_order: SiblingOrder::default(),
            start_open: true,
            open_on_load: true,
        }
    }
}

/// Code viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_true")]
    pub line_numbers: bool,

    #[serde(default = "default_true")]
    pub syntax_highlighting: bool,

    /// Name of a theme bundled with syntect
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Also copy through the OSC 52 escape sequence (works over SSH)
    #[serde(default = "default_true")]
    pub osc52_clipboard: bool,
}

fn default_theme_name() -> String {
    "base16-ocean.dark".to_string()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            syntax_highlighting: true,
            theme: default_theme_name(),
            osc52_clipboard: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long a copy or error notice stays visible
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
}

fn default_ttl_ms() -> u64 {
    2500
}

impl NotificationConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_ttl_ms(),
        }
    }
}

/// Code-generation endpoint and sampling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL; requests go to `{endpoint}/generate`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_frequency_penalty")]
    pub frequency_penalty: f32,

    #[serde(default = "default_num_docs")]
    pub num_docs: u32,

    /// Whole-request timeout; generation can take a while
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_top_p() -> f32 {
    0.9
}

fn default_frequency_penalty() -> f32 {
    0.5
}

fn default_num_docs() -> u32 {
    3
}

fn default_timeout_ms() -> u64 {
    120_000
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            frequency_penalty: default_frequency_penalty(),
            num_docs: default_num_docs(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            panel: PanelConfig::default(),
            viewer: ViewerConfig::default(),
            notifications: NotificationConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    /// The config filename used throughout the application
    pub const FILENAME: &'static str = "config.json";

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Path of the project-local config file
    pub fn local_config_path(working_dir: &Path) -> std::path::PathBuf {
        working_dir.join(Self::FILENAME)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = self.panel.tree_width;
        if !(width > 0.0 && width <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "panel.tree_width must be in (0, 1], got {width}"
            )));
        }

        if self.notifications.ttl_ms == 0 {
            return Err(ConfigError::ValidationError(
                "notifications.ttl_ms must be greater than 0".to_string(),
            ));
        }

        if self.generation.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "generation.endpoint cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
