//! Services: clipboard, generation client, logging and terminal setup
//!
//! Everything that touches the outside world lives here. The clock and the
//! in-memory clipboard are always available; the rest needs the `runtime`
//! feature.

pub mod clipboard;
pub mod generation;
pub mod time_source;

#[cfg(feature = "runtime")]
pub mod log_dirs;
#[cfg(feature = "runtime")]
pub mod terminal_modes;
#[cfg(feature = "runtime")]
pub mod tracing_setup;
#[cfg(feature = "runtime")]
pub mod warning_log;
