use crate::config::{Config, ConfigError};
use std::path::{Path, PathBuf};

impl Config {
    /// Config search paths that exist on disk, local first.
    ///
    /// Search order:
    /// 1. `{working_dir}/config.json` (project-local config)
    /// 2. `{config_dir}/config.json` (user config, see `DirectoryContext`)
    fn config_search_paths(working_dir: &Path, dir_context: &DirectoryContext) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(2);

        let local = Self::local_config_path(working_dir);
        if local.exists() {
            paths.push(local);
        }

        let user = dir_context.config_path();
        if !paths.contains(&user) && user.exists() {
            paths.push(user);
        }

        paths
    }

    /// Find the first existing config file, checking the working directory first.
    pub fn find_config_path(working_dir: &Path, dir_context: &DirectoryContext) -> Option<PathBuf> {
        Self::config_search_paths(working_dir, dir_context)
            .into_iter()
            .next()
    }

    /// Load configuration, checking the working directory first, then the user config.
    ///
    /// Falls back to defaults if no config file is found or all fail to load.
    pub fn load_for_working_dir(working_dir: &Path, dir_context: &DirectoryContext) -> Self {
        for path in Self::config_search_paths(working_dir, dir_context) {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load config from {}: {}, trying next option",
                        path.display(),
                        e
                    );
                }
            }
        }
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Save configuration to a JSON file, only saving fields that differ from defaults.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let current =
            serde_json::to_value(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        let defaults = serde_json::to_value(Self::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        let diff = json_diff(&defaults, &current);

        let contents = serde_json::to_string_pretty(&diff)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Compute the difference between two JSON values.
/// Returns only the parts of `current` that differ from `defaults`.
fn json_diff(defaults: &serde_json::Value, current: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match (defaults, current) {
        (Value::Object(def_map), Value::Object(cur_map)) => {
            let mut result = serde_json::Map::new();

            for (key, cur_val) in cur_map {
                match def_map.get(key) {
                    Some(def_val) => {
                        let diff = json_diff(def_val, cur_val);
                        if !is_empty_diff(&diff) {
                            result.insert(key.clone(), diff);
                        }
                    }
                    None => {
                        result.insert(key.clone(), cur_val.clone());
                    }
                }
            }

            Value::Object(result)
        }
        // Empty object signals "no diff"
        _ if defaults == current => Value::Object(serde_json::Map::new()),
        _ => current.clone(),
    }
}

fn is_empty_diff(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Directory paths for configuration and state
///
/// Only `main` should use `dirs::*` to construct this; everything else
/// receives it as a parameter so tests can point it at a temp directory.
#[derive(Debug, Clone)]
pub struct DirectoryContext {
    /// User configuration, e.g. ~/.config/codepanel on Linux
    pub config_dir: PathBuf,

    /// Persistent data such as saved responses, e.g. ~/.local/share/codepanel
    pub data_dir: PathBuf,
}

impl DirectoryContext {
    /// Create a DirectoryContext from the system directories
    pub fn from_system() -> std::io::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .join("codepanel");

        let data_dir = dirs::data_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine data directory",
                )
            })?
            .join("codepanel");

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// All paths point to subdirectories within `temp_dir`
    pub fn for_testing(temp_dir: &Path) -> Self {
        Self {
            config_dir: temp_dir.join("config"),
            data_dir: temp_dir.join("data"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(Config::FILENAME)
    }

    /// Where the last successful generation response is kept
    pub fn last_response_path(&self) -> PathBuf {
        self.data_dir.join("last_response.json")
    }
}
