//! The per-request confirmation workflow.
//!
//! Owns one pending confirmable action from prompt to terminal outcome:
//! post the interactive prompt, race the resolution channel against the
//! waiting window, invoke the configured follow-up effect, update the
//! outward message, and release the registry slot.
//!
//! A timer expiry is treated as confirmation (the action proceeds with the
//! automation pseudo-identity). That fail-open policy is deliberate and
//! matches the configured product behavior.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use hearth_connect::{Attachment, AttachmentAction, ChatClient, ConnectError, HomeBackend};

use crate::catalog::ActionDefinition;
use crate::registry::{ConfirmationRegistry, Resolution};

/// One in-flight confirmable action, from prompt to terminal outcome.
pub struct ConfirmationWorkflow {
    registry: Arc<ConfirmationRegistry>,
    chat: Arc<dyn ChatClient>,
    backend: Arc<dyn HomeBackend>,
    action: ActionDefinition,
    requested_by: String,
    timeout: Duration,
}

impl ConfirmationWorkflow {
    pub fn new(
        registry: Arc<ConfirmationRegistry>,
        chat: Arc<dyn ChatClient>,
        backend: Arc<dyn HomeBackend>,
        action: ActionDefinition,
        requested_by: String,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            chat,
            backend,
            action,
            requested_by,
            timeout,
        }
    }

    /// Drive the request to its terminal state.
    ///
    /// The caller must have obtained `rx` from a `begin` that returned a new
    /// entry; this workflow owns that entry and removes it exactly once on
    /// the way out.
    pub async fn run(self, mut rx: mpsc::Receiver<Resolution>) {
        let text = prompt_text(&self.requested_by, &self.action.message);
        let prompt = [confirmation_prompt(&self.action.id)];

        let message = match self.chat.post_message(&text, &prompt).await {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(action_id = %self.action.id, error = %e, "Failed to post confirmation prompt");
                self.registry.remove(&self.action.id);
                return;
            }
        };

        tracing::info!(action_id = %self.action.id, "Awaiting confirmation");

        // Exactly one arm fires; the loser is dropped. A closed channel can
        // only mean the registry entry vanished, so fall back to the timer
        // behavior.
        let resolution = tokio::select! {
            _ = tokio::time::sleep(self.timeout) => {
                tracing::info!(action_id = %self.action.id, "Confirmation window elapsed, continuing");
                Resolution::TimedOut
            }
            delivered = rx.recv() => delivered.unwrap_or(Resolution::TimedOut),
        };

        let mut annotations = vec![outcome_attachment(&resolution)];

        let effect = if resolution.approved() {
            Some(&self.action.on_confirm)
        } else {
            self.action.on_cancel.as_ref()
        };

        if let Some(call) = effect {
            if let Err(e) = self.backend.invoke_service(call).await {
                tracing::warn!(action_id = %self.action.id, error = %e, "Follow-up effect failed");
                annotations.push(effect_failed(&e));
            }
        }

        if let Err(e) = self.chat.update_message(&message, &text, &annotations).await {
            tracing::warn!(action_id = %self.action.id, error = %e, "Failed to update outcome message");
        }

        // Terminal: release the slot. A resolution arriving after this
        // point is dropped by the registry.
        self.registry.remove(&self.action.id);
    }
}

/// The line announcing who asked for what.
pub(crate) fn prompt_text(user: &str, message: &str) -> String {
    format!("<@{}> {}", user, message)
}

/// The interactive prompt with confirm/cancel buttons. The callback id
/// correlates button presses back to the pending action.
fn confirmation_prompt(action_id: &str) -> Attachment {
    Attachment {
        text: "You can override this action if you want".to_string(),
        fallback: Some("You are unable to override this action on this device".to_string()),
        callback_id: Some(action_id.to_string()),
        actions: vec![
            AttachmentAction::button("I object!", "no").danger(),
            AttachmentAction::button("Go ahead", "yes"),
        ],
    }
}

fn outcome_attachment(resolution: &Resolution) -> Attachment {
    match resolution {
        Resolution::Confirmed { user } => {
            Attachment::text(format!(":heavy_check_mark: Thanks <@{}> for confirming!", user))
        }
        Resolution::Cancelled { user } => Attachment::text(format!(":x: <@{}> cancelled!", user)),
        Resolution::TimedOut => Attachment::text(":stopwatch: Time expired. Continuing"),
    }
}

fn effect_failed(err: &ConnectError) -> Attachment {
    Attachment::text(format!(":x: Failed to execute: {}", err))
}
