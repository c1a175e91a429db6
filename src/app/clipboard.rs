//! Copying the selected file to the clipboard
//!
//! The copy itself runs on the clipboard service; its outcome arrives on a
//! later `tick()` and becomes a transient notification. A failed copy never
//! changes the panel state.

use rust_i18n::t;

use super::*;

impl CodePanelController {
    /// Copy the raw content of the selected file
    pub fn copy_selection(&mut self) {
        let Some(text) = self.viewer.copy_text() else {
            self.notify(NotificationKind::Info, t!("clipboard.nothing_selected").to_string());
            return;
        };
        self.clipboard.copy(text.to_string());
    }

    pub(super) fn drain_clipboard(&mut self) {
        while let Some(outcome) = self.clipboard.poll() {
            match outcome {
                Ok(bytes) => {
                    tracing::debug!("Copied {} bytes", bytes);
                    self.notify(
                        NotificationKind::Success,
                        t!("clipboard.copied", bytes = bytes).to_string(),
                    );
                }
                Err(e) => {
                    let issue = PanelIssue::ClipboardUnavailable {
                        reason: e.to_string(),
                    };
                    tracing::warn!("{}", issue);
                    self.notify(
                        NotificationKind::Failure,
                        t!("clipboard.failed", error = e.to_string()).to_string(),
                    );
                }
            }
        }
    }
}
