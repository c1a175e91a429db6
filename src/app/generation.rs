//! Prompt line and generation requests
//!
//! Submitting the prompt starts a request on the generation session and
//! returns immediately. The response is applied on a later `tick()`; a failed
//! request leaves the current artifacts untouched.

use rust_i18n::t;

use super::*;
use crate::services::generation::GenerationError;

impl CodePanelController {
    /// Focus the prompt line
    pub fn open_prompt(&mut self) {
        if self.focus != Focus::Prompt {
            self.focus_before_prompt = self.focus;
            self.focus = Focus::Prompt;
        }
    }

    /// Leave the prompt, keeping its text for next time
    pub fn cancel_prompt(&mut self) {
        if self.focus == Focus::Prompt {
            self.focus = self.focus_before_prompt;
        }
    }

    /// Send the prompt text as a new generation request
    pub fn submit_prompt(&mut self) {
        if self.prompt.is_blank() {
            self.cancel_prompt();
            return;
        }
        let text = self.prompt.take();
        self.cancel_prompt();
        self.request_generation(text);
    }

    /// Start a generation request; the newest request supersedes older ones
    pub fn request_generation(&mut self, prompt: String) {
        let Some(session) = self.generation.as_mut() else {
            self.notify(
                NotificationKind::Failure,
                t!("generation.unavailable").to_string(),
            );
            return;
        };

        let ticket = session.submit(prompt);
        tracing::info!("Submitted generation request #{}", ticket);
        self.notify(NotificationKind::Info, t!("generation.requested").to_string());
    }

    /// True while a generation request is outstanding
    pub fn is_generating(&self) -> bool {
        self.generation
            .as_ref()
            .is_some_and(|session| session.is_pending())
    }

    pub(super) fn drain_generation(&mut self) {
        let Some((ticket, result)) = self.generation.as_mut().and_then(|s| s.poll_latest()) else {
            return;
        };

        match result {
            Ok(response) => {
                tracing::info!("Generation #{} finished", ticket);
                self.archive_response(&response);
                self.load_response(response);
            }
            Err(e) => self.generation_failed(ticket, e),
        }
    }

    fn generation_failed(&mut self, ticket: u64, error: GenerationError) {
        tracing::warn!("Generation #{} failed: {}", ticket, error);
        self.notify(
            NotificationKind::Failure,
            t!("generation.failed", error = error.to_string()).to_string(),
        );
    }

    fn archive_response(&self, response: &GenerationResponse) {
        let Some(path) = &self.response_archive else {
            return;
        };
        let result = serde_json::to_string_pretty(response)
            .map_err(std::io::Error::from)
            .and_then(|body| {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, body)
            });
        if let Err(e) = result {
            tracing::warn!("Failed to save response to {}: {}", path.display(), e);
        }
    }
}
