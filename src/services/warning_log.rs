//! Warning log layer for tracing
//!
//! Captures WARN and ERROR events to a separate file and forwards each
//! message to the panel, which shows a warning count in its status bar.
//! Duplicate messages are suppressed to avoid log spam.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Deduplication state for warning messages
struct DeduplicationState {
    /// Map from message hash to (last_seen_time, count)
    recent_messages: HashMap<u64, (Instant, usize)>,
    /// Messages repeated within this window are suppressed
    window: Duration,
    /// Maximum number of unique messages to track
    max_entries: usize,
}

impl DeduplicationState {
    fn new() -> Self {
        Self {
            recent_messages: HashMap::new(),
            window: Duration::from_secs(5),
            max_entries: 100,
        }
    }

    /// Returns (should_log, suppressed_count); the count is non-zero when a
    /// message is logged again after duplicates were dropped
    fn check_message(&mut self, message: &str, now: Instant) -> (bool, usize) {
        let hash = hash_message(message);

        if self.recent_messages.len() > self.max_entries {
            let window = self.window;
            self.recent_messages
                .retain(|_, (time, _)| now.duration_since(*time) < window * 2);
        }

        match self.recent_messages.get_mut(&hash) {
            Some((last_seen, count)) if now.duration_since(*last_seen) < self.window => {
                *count += 1;
                *last_seen = now;
                (false, 0)
            }
            Some((last_seen, count)) => {
                let suppressed = *count;
                *count = 1;
                *last_seen = now;
                (true, suppressed.saturating_sub(1))
            }
            None => {
                self.recent_messages.insert(hash, (now, 1));
                (true, 0)
            }
        }
    }
}

fn hash_message(message: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    message.hash(&mut hasher);
    hasher.finish()
}

/// A tracing layer that writes WARN+ logs to a file and forwards them via channel
pub struct WarningLogLayer {
    file: Arc<Mutex<File>>,
    sender: mpsc::Sender<String>,
    dedup: Arc<Mutex<DeduplicationState>>,
}

/// Handle returned from setup, containing the receiver and log path
pub struct WarningLogHandle {
    /// Receives the message of every logged warning
    pub receiver: mpsc::Receiver<String>,
    /// Path to the warning log file
    pub path: PathBuf,
}

/// Create a warning log layer writing to the per-process warnings file
pub fn create() -> std::io::Result<(WarningLogLayer, WarningLogHandle)> {
    create_with_path(super::log_dirs::warnings_log_path())
}

/// Create a warning log layer with a specific path
pub fn create_with_path(path: PathBuf) -> std::io::Result<(WarningLogLayer, WarningLogHandle)> {
    let file = File::create(&path)?;
    let (sender, receiver) = mpsc::channel();

    let layer = WarningLogLayer {
        file: Arc::new(Mutex::new(file)),
        sender,
        dedup: Arc::new(Mutex::new(DeduplicationState::new())),
    };

    Ok((layer, WarningLogHandle { receiver, path }))
}

impl<S> Layer<S> for WarningLogLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if level > Level::WARN {
            return;
        }

        let mut visitor = StringVisitor::default();
        event.record(&mut visitor);

        let (should_log, suppressed_count) = match self.dedup.lock() {
            Ok(mut dedup) => dedup.check_message(&visitor.0, Instant::now()),
            Err(_) => (true, 0),
        };
        if !should_log {
            return;
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let target = event.metadata().target();

        let line = if suppressed_count > 0 {
            format!(
                "{} {} {}: {} (suppressed {} similar messages)\n",
                timestamp, level, target, visitor.0, suppressed_count
            )
        } else {
            format!("{} {} {}: {}\n", timestamp, level, target, visitor.0)
        };

        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }

        let _ = self.sender.send(visitor.0);
    }
}

/// Collects the message field plus any extra fields of an event
#[derive(Default)]
struct StringVisitor(String);

impl StringVisitor {
    fn push_field(&mut self, name: &str, value: String) {
        if name == "message" {
            // Fields may be recorded before the message
            self.0 = if self.0.is_empty() {
                value
            } else {
                format!("{} {}", value, self.0)
            };
        } else if self.0.is_empty() {
            self.0 = format!("{}={}", name, value);
        } else {
            self.0.push_str(&format!(" {}={}", name, value));
        }
    }
}

impl tracing::field::Visit for StringVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push_field(field.name(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push_field(field.name(), value.to_string());
    }
}
