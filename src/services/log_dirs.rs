//! XDG-compliant log directory management
//!
//! Logs are stored in `$XDG_STATE_HOME/codepanel/logs/` (typically
//! `~/.local/state/codepanel/logs/`). Each instance writes PID-based files so
//! concurrent runs never share a log; files from earlier runs are removed once
//! they are a day old.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

/// Minimum age for log files to be cleaned up (24 hours)
const CLEANUP_AGE: Duration = Duration::from_secs(24 * 60 * 60);

const APP_DIR: &str = "codepanel";

/// Cached log directory path
static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get the base log directory, creating it if necessary.
///
/// Falls back to the system temp directory when the XDG directory cannot be
/// created.
pub fn log_dir() -> &'static PathBuf {
    LOG_DIR.get_or_init(|| {
        let fallback = std::env::temp_dir().join("codepanel-logs");
        let dir = xdg_log_dir().unwrap_or_else(|| fallback.clone());

        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Failed to create log directory {:?}: {}", dir, e);
            let _ = fs::create_dir_all(&fallback);
            return fallback;
        }

        dir
    })
}

fn xdg_log_dir() -> Option<PathBuf> {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        let path = PathBuf::from(state_home);
        if path.is_absolute() {
            return Some(path.join(APP_DIR).join("logs"));
        }
    }

    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("state")))
        .map(|state| state.join(APP_DIR).join("logs"))
}

/// `{log_dir}/codepanel-{PID}.log`
pub fn main_log_path() -> PathBuf {
    log_dir().join(format!("codepanel-{}.log", std::process::id()))
}

/// `{log_dir}/codepanel-{PID}-warnings.log`
pub fn warnings_log_path() -> PathBuf {
    log_dir().join(format!("codepanel-{}-warnings.log", std::process::id()))
}

/// Remove log files left behind by earlier runs.
pub fn cleanup_stale_logs() {
    cleanup_stale_logs_in_dir(log_dir(), std::process::id(), CLEANUP_AGE);
}

fn cleanup_stale_logs_in_dir(dir: &Path, current_pid: u32, age: Duration) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        let Some(pid) = extract_pid_from_filename(&name) else {
            continue;
        };
        if pid == current_pid {
            continue;
        }

        if entry.file_type().map(|t| t.is_file()).unwrap_or(false)
            && is_file_older_than(&entry.path(), age)
        {
            if let Err(e) = fs::remove_file(entry.path()) {
                tracing::debug!("Failed to clean up stale log {:?}: {}", entry.path(), e);
            } else {
                tracing::debug!("Cleaned up stale log file: {:?}", entry.path());
            }
        }
    }
}

fn is_file_older_than(path: &Path, age: Duration) -> bool {
    let Ok(modified) = fs::metadata(path).and_then(|m| m.modified()) else {
        return false;
    };

    SystemTime::now()
        .duration_since(modified)
        .map(|elapsed| elapsed >= age)
        .unwrap_or(false)
}

/// Extract the PID from `codepanel-{PID}.log` or `codepanel-{PID}-warnings.log`
fn extract_pid_from_filename(name: &str) -> Option<u32> {
    let stem = name.strip_suffix(".log")?;
    let stem = stem.strip_suffix("-warnings").unwrap_or(stem);
    let rest = stem.strip_prefix("codepanel-")?;
    rest.parse().ok()
}

/// Print all directories used by codepanel to stdout
pub fn print_all_paths(config_dir: &Path) {
    use std::io::Write;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "codepanel directories:").ok();
    writeln!(handle).ok();
    writeln!(handle, "Config:     {}", config_dir.display()).ok();
    writeln!(
        handle,
        "  config.json:  {}",
        config_dir.join("config.json").display()
    )
    .ok();
    writeln!(handle).ok();
    writeln!(handle, "Logs:       {}", log_dir().display()).ok();
    writeln!(handle, "  main:         {}", main_log_path().display()).ok();
    writeln!(handle, "  warnings:     {}", warnings_log_path().display()).ok();
}
