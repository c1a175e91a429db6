//! Clipboard module: copies viewer content to the system clipboard
//!
//! This module provides:
//! - A `ClipboardProvider` trait with a system implementation and an
//!   in-memory one for tests
//! - `SystemClipboard`, which goes through the arboard crate
//!   (X11/Wayland/macOS/Windows APIs), plus an OSC 52 emitter that the
//!   service runs on the UI thread
//! - `ClipboardService`, which runs copies off the UI thread and reports
//!   outcomes over a channel so a slow or denied clipboard never blocks input

use std::fmt;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

/// Why a copy failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard could be reached (no display server, unsupported platform)
    Unavailable(String),
    /// The platform refused the write
    Denied(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Unavailable(msg) => write!(f, "clipboard unavailable: {msg}"),
            ClipboardError::Denied(msg) => write!(f, "clipboard access denied: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Result of one copy: number of bytes placed on the clipboard
pub type CopyOutcome = Result<usize, ClipboardError>;

/// Something that can receive text
pub trait ClipboardProvider: Send {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-memory clipboard.
///
/// Clones share the same contents, so a test can keep a handle after giving
/// the provider to the panel.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
    failure: Option<ClipboardError>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails with `error`
    pub fn failing(error: ClipboardError) -> Self {
        Self {
            contents: Arc::default(),
            failure: Some(error),
        }
    }

    /// Last text written, if any
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|guard| guard.clone())
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| ClipboardError::Unavailable("memory clipboard poisoned".to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}

#[cfg(feature = "runtime")]
pub use system::{send_osc52, SystemClipboard};

#[cfg(feature = "runtime")]
mod system {
    use super::{ClipboardError, ClipboardProvider};
    use crossterm::clipboard::CopyToClipboard;
    use crossterm::execute;
    use std::io::{stdout, Write};
    use std::sync::Mutex;

    /// Global clipboard holder to maintain X11 clipboard ownership for the application lifetime.
    /// On X11, the clipboard owner must stay alive to respond to paste requests from other apps.
    static SYSTEM_CLIPBOARD: Mutex<Option<arboard::Clipboard>> = Mutex::new(None);

    /// Emit the OSC 52 escape sequence (works over SSH in most terminals).
    ///
    /// Writes to stdout, so it must run on the thread that draws the UI.
    pub fn send_osc52(text: &str) -> bool {
        let mut out = stdout().lock();
        let sent = match execute!(out, CopyToClipboard::to_clipboard_from(text)) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("OSC 52 clipboard copy failed: {}", e);
                false
            }
        };
        let _ = out.flush();
        sent
    }

    /// System clipboard via arboard
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClipboard;

    impl SystemClipboard {
        pub fn new() -> Self {
            Self
        }
    }

    fn unavailable(error: arboard::Error) -> ClipboardError {
        ClipboardError::Unavailable(error.to_string())
    }

    impl ClipboardProvider for SystemClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            let mut guard = SYSTEM_CLIPBOARD
                .lock()
                .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".to_string()))?;

            if guard.is_none() {
                *guard = Some(arboard::Clipboard::new().map_err(unavailable)?);
            }

            let first_attempt = match guard.as_mut() {
                Some(clipboard) => clipboard.set_text(text),
                None => return Err(ClipboardError::Unavailable("no clipboard".to_string())),
            };

            match first_attempt {
                Ok(()) => {
                    tracing::debug!("Copied {} bytes to system clipboard", text.len());
                    Ok(())
                }
                Err(e) => {
                    // The owner may have gone stale (e.g. display restarted); retry once
                    tracing::debug!("arboard copy failed: {}, recreating clipboard", e);
                    let mut clipboard = arboard::Clipboard::new().map_err(unavailable)?;
                    clipboard.set_text(text).map_err(unavailable)?;
                    *guard = Some(clipboard);
                    Ok(())
                }
            }
        }
    }
}

/// Emits a terminal escape sequence carrying the copied text; returns
/// whether it was written
pub type EscapeEmitter = fn(&str) -> bool;

/// Runs copies and reports their outcomes.
///
/// In background mode every copy runs on its own thread; outcomes are
/// collected with `poll()`. Inline mode runs the copy on the caller's thread,
/// which keeps tests deterministic. The escape emitter always runs on the
/// caller's thread, since it shares stdout with the renderer.
pub struct ClipboardService {
    provider: Arc<Mutex<Box<dyn ClipboardProvider>>>,
    sender: mpsc::Sender<CopyOutcome>,
    receiver: mpsc::Receiver<CopyOutcome>,
    background: bool,
    escape: Option<EscapeEmitter>,
}

impl ClipboardService {
    pub fn new(provider: Box<dyn ClipboardProvider>, background: bool) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            provider: Arc::new(Mutex::new(provider)),
            sender,
            receiver,
            background,
            escape: None,
        }
    }

    /// Also hand each copy to `emitter` before the provider runs.
    ///
    /// A copy whose escape was written counts as successful even if the
    /// provider fails, since the terminal cannot report back.
    pub fn with_escape(mut self, emitter: EscapeEmitter) -> Self {
        self.escape = Some(emitter);
        self
    }

    /// Service backed by the system clipboard, copying in the background
    #[cfg(feature = "runtime")]
    pub fn system(osc52: bool) -> Self {
        let service = Self::new(Box::new(SystemClipboard::new()), true);
        if osc52 {
            service.with_escape(send_osc52)
        } else {
            service
        }
    }

    /// Inline service backed by an in-memory clipboard
    pub fn memory(clipboard: MemoryClipboard) -> Self {
        Self::new(Box::new(clipboard), false)
    }

    /// Start copying `text`; the outcome arrives through `poll()`
    pub fn copy(&self, text: String) {
        let escape_sent = self.escape.is_some_and(|emit| emit(&text));
        let provider = Arc::clone(&self.provider);
        let sender = self.sender.clone();

        let job = move || {
            let outcome = match provider.lock() {
                Ok(mut provider) => provider.set_text(&text).map(|()| text.len()),
                Err(_) => Err(ClipboardError::Unavailable(
                    "clipboard provider poisoned".to_string(),
                )),
            };
            let outcome = match outcome {
                Err(e) if escape_sent => {
                    tracing::debug!("clipboard provider failed ({}), relying on escape sequence", e);
                    Ok(text.len())
                }
                other => other,
            };
            // Receiver only goes away with the service itself
            let _ = sender.send(outcome);
        };

        if self.background {
            thread::spawn(job);
        } else {
            job();
        }
    }

    /// Next finished copy, if any
    pub fn poll(&self) -> Option<CopyOutcome> {
        self.receiver.try_recv().ok()
    }
}

impl fmt::Debug for ClipboardService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipboardService")
            .field("background", &self.background)
            .field("escape", &self.escape.is_some())
            .finish_non_exhaustive()
    }
}
