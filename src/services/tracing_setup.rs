//! Tracing subscriber setup
//!
//! Shared tracing configuration used by the binary and by tests.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use super::warning_log::{WarningLogHandle, WarningLogLayer};

/// Initialize the global tracing subscriber with file logging and warning capture.
///
/// This sets up:
/// - File-based logging to `log_file_path`
/// - Environment-based filtering (RUST_LOG) with DEBUG default
/// - A warning layer that copies WARN+ to a separate file
///
/// Returns the warning log handle if successful, None if setup failed.
pub fn init_global(log_file_path: &Path) -> Option<WarningLogHandle> {
    let (warning_layer, warning_handle) = super::warning_log::create().ok()?;
    let log_file = File::create(log_file_path).ok()?;

    build_subscriber(log_file, Some(warning_layer)).init();

    Some(warning_handle)
}

/// Build a subscriber with file logging and an optional warning layer.
pub fn build_subscriber(
    log_file: File,
    warning_layer: Option<WarningLogLayer>,
) -> impl tracing::Subscriber + Send + Sync {
    let mut env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into());
    // ureq logs every connection at debug
    if let Ok(directive) = "ureq=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    let fmt_layer = fmt::layer().with_ansi(false).with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .with(warning_layer)
}
