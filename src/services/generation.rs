//! Client side of the code-generation endpoint
//!
//! `GenerationClient` performs one blocking `POST {endpoint}/generate`.
//! `GenerationSession` runs requests on worker threads and hands back only
//! the result of the most recent request: every submission gets an increasing
//! ticket and results carrying an older ticket are dropped when drained.

use crate::config::GenerationConfig;
use crate::model::{GenerateRequest, GenerationResponse};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

/// Why a generation request produced no response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Connection, DNS, TLS or timeout failure
    Transport(String),
    /// The endpoint answered with a non-2xx status
    Status { code: u16, body: String },
    /// The body was not a generation response
    Decode(String),
    /// The worker thread ended without reporting
    WorkerGone,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Transport(msg) => write!(f, "request failed: {msg}"),
            GenerationError::Status { code, body } if body.is_empty() => {
                write!(f, "endpoint returned status {code}")
            }
            GenerationError::Status { code, body } => {
                write!(f, "endpoint returned status {code}: {body}")
            }
            GenerationError::Decode(msg) => write!(f, "invalid response: {msg}"),
            GenerationError::WorkerGone => write!(f, "generation worker stopped unexpectedly"),
        }
    }
}

impl std::error::Error for GenerationError {}

pub type GenerationResult = Result<GenerationResponse, GenerationError>;

/// Anything that can turn a prompt into a generation response
pub trait GenerationBackend: Send + Sync {
    fn generate(&self, prompt: &str) -> GenerationResult;
}

/// Build the request body for `prompt` from the configured sampling parameters
pub fn build_request(config: &GenerationConfig, prompt: &str) -> GenerateRequest {
    GenerateRequest {
        prompt: prompt.to_string(),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        top_p: config.top_p,
        frequency_penalty: config.frequency_penalty,
        num_docs: config.num_docs,
    }
}

/// Read a saved generation response from a file, or from stdin when `path` is `-`
pub fn load_response_file(path: &Path) -> std::io::Result<GenerationResponse> {
    let body = if path.as_os_str() == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        body
    } else {
        std::fs::read_to_string(path)?
    };

    GenerationResponse::from_json(&body)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[cfg(feature = "runtime")]
pub use client::GenerationClient;

#[cfg(feature = "runtime")]
mod client {
    use super::{build_request, GenerationBackend, GenerationError, GenerationResult};
    use crate::config::GenerationConfig;
    use crate::model::GenerationResponse;
    use std::time::Duration;

    /// Longest error body kept for display
    const MAX_ERROR_BODY: usize = 200;

    /// Blocking HTTP client for `POST {endpoint}/generate`
    #[derive(Debug, Clone)]
    pub struct GenerationClient {
        url: String,
        timeout: Duration,
        config: GenerationConfig,
    }

    impl GenerationClient {
        pub fn new(config: &GenerationConfig) -> Self {
            Self {
                url: format!("{}/generate", config.endpoint.trim_end_matches('/')),
                timeout: config.timeout(),
                config: config.clone(),
            }
        }

        pub fn url(&self) -> &str {
            &self.url
        }
    }

    impl GenerationBackend for GenerationClient {
        fn generate(&self, prompt: &str) -> GenerationResult {
            let request = build_request(&self.config, prompt);
            let body = serde_json::to_string(&request)
                .map_err(|e| GenerationError::Decode(e.to_string()))?;

            tracing::debug!("POST {} ({} byte prompt)", self.url, prompt.len());

            let response = ureq::post(&self.url)
                .set("Content-Type", "application/json")
                .timeout(self.timeout)
                .send_bytes(body.as_bytes())
                .map_err(|e| match e {
                    ureq::Error::Status(code, response) => {
                        let mut body = response.into_string().unwrap_or_default();
                        if body.len() > MAX_ERROR_BODY {
                            let mut cut = MAX_ERROR_BODY;
                            while !body.is_char_boundary(cut) {
                                cut -= 1;
                            }
                            body.truncate(cut);
                        }
                        GenerationError::Status {
                            code,
                            body: body.trim().to_string(),
                        }
                    }
                    ureq::Error::Transport(transport) => {
                        GenerationError::Transport(transport.to_string())
                    }
                })?;

            let text = response
                .into_string()
                .map_err(|e| GenerationError::Transport(e.to_string()))?;

            GenerationResponse::from_json(&text).map_err(|e| GenerationError::Decode(e.to_string()))
        }
    }
}

/// Reports `WorkerGone` if the worker ends without sending a result
struct TicketGuard {
    ticket: u64,
    sender: Option<mpsc::Sender<(u64, GenerationResult)>>,
}

impl TicketGuard {
    fn finish(mut self, result: GenerationResult) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send((self.ticket, result));
        }
    }
}

impl Drop for TicketGuard {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send((self.ticket, Err(GenerationError::WorkerGone)));
        }
    }
}

/// Runs generation requests off the UI thread, newest request wins
pub struct GenerationSession {
    backend: Arc<dyn GenerationBackend>,
    sender: mpsc::Sender<(u64, GenerationResult)>,
    receiver: mpsc::Receiver<(u64, GenerationResult)>,
    next_ticket: u64,
    /// Ticket whose result is still awaited
    pending: Option<u64>,
}

impl GenerationSession {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            backend,
            sender,
            receiver,
            next_ticket: 1,
            pending: None,
        }
    }

    /// Start a request for `prompt` and return its ticket.
    ///
    /// Any request still running is superseded; its result will be discarded.
    pub fn submit(&mut self, prompt: String) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(ticket);

        let backend = Arc::clone(&self.backend);
        let guard = TicketGuard {
            ticket,
            sender: Some(self.sender.clone()),
        };

        thread::spawn(move || {
            let result = backend.generate(&prompt);
            guard.finish(result);
        });

        ticket
    }

    /// True while the most recent request has not reported back
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_ticket(&self) -> Option<u64> {
        self.pending
    }

    /// Drain finished requests, returning the result of the most recent one
    /// once it is available. Results of superseded requests are dropped.
    pub fn poll_latest(&mut self) -> Option<(u64, GenerationResult)> {
        let mut latest = None;
        while let Ok((ticket, result)) = self.receiver.try_recv() {
            if Some(ticket) == self.pending {
                self.pending = None;
                latest = Some((ticket, result));
            } else {
                tracing::debug!("Discarding result of superseded generation #{}", ticket);
            }
        }
        latest
    }
}

impl fmt::Debug for GenerationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationSession")
            .field("next_ticket", &self.next_ticket)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
