//! The command router: from mention text to query or action.
//!
//! Consults the catalog, runs non-confirmable actions directly, feeds
//! confirmable actions through the registry and workflow, and hands query
//! matches to the state query executor. The router is invoked from spawned
//! tasks so the inbound webhook handler never waits on it.

use std::sync::Arc;
use std::time::Duration;

use hearth_connect::{Attachment, ChatClient, HomeBackend};

use crate::catalog::{ActionDefinition, Command, CommandCatalog};
use crate::query::StateQueryExecutor;
use crate::registry::{Begin, ConfirmationRegistry, Resolution};
use crate::workflow::{self, ConfirmationWorkflow};

/// Routes inbound commands to queries, direct actions, or confirmation
/// workflows.
pub struct CommandRouter {
    catalog: CommandCatalog,
    registry: Arc<ConfirmationRegistry>,
    chat: Arc<dyn ChatClient>,
    backend: Arc<dyn HomeBackend>,
    executor: StateQueryExecutor,
    confirm_timeout: Duration,
}

impl CommandRouter {
    pub fn new(
        catalog: CommandCatalog,
        registry: Arc<ConfirmationRegistry>,
        chat: Arc<dyn ChatClient>,
        backend: Arc<dyn HomeBackend>,
        confirm_timeout: Duration,
    ) -> Self {
        let executor = StateQueryExecutor::new(Arc::clone(&backend));
        Self {
            catalog,
            registry,
            chat,
            backend,
            executor,
            confirm_timeout,
        }
    }

    /// Handle one inbound mention from `user`.
    pub async fn dispatch(&self, text: &str, user: &str) {
        match self.catalog.lookup(text) {
            Some(Command::Action(action)) => {
                tracing::info!(action_id = %action.id, user, "Matched action");
                if action.requires_confirm {
                    self.start_confirmable(action, user).await;
                } else {
                    self.run_direct(action).await;
                }
            }
            Some(Command::Query(query)) => {
                tracing::info!(query_id = %query.id, user, "Matched query");
                self.run_query(&query.entity).await;
            }
            None => {
                self.post("I'm sorry, I don't know what that means", &[]).await;
            }
        }
    }

    /// Deliver an interactive button press for `action_id`.
    ///
    /// Returns `false` when no entry is pending for the identifier (a stale
    /// press, e.g. after the timeout already fired).
    pub fn resolve_interaction(&self, action_id: &str, user: &str, approved: bool) -> bool {
        let resolution = if approved {
            Resolution::Confirmed {
                user: user.to_string(),
            }
        } else {
            Resolution::Cancelled {
                user: user.to_string(),
            }
        };
        self.registry.resolve(action_id, resolution)
    }

    async fn run_direct(&self, action: &ActionDefinition) {
        match self.backend.invoke_service(&action.on_confirm).await {
            Ok(()) => {
                self.post(&action.message, &[]).await;
            }
            Err(e) => {
                tracing::warn!(action_id = %action.id, error = %e, "Direct action failed");
                self.post(&format!("I'm sorry, I encountered an error: {}", e), &[])
                    .await;
            }
        }
    }

    async fn start_confirmable(&self, action: &ActionDefinition, user: &str) {
        match self.registry.begin(&action.id) {
            Begin::New(rx) => {
                let workflow = ConfirmationWorkflow::new(
                    Arc::clone(&self.registry),
                    Arc::clone(&self.chat),
                    Arc::clone(&self.backend),
                    action.clone(),
                    user.to_string(),
                    self.confirm_timeout,
                );
                tokio::spawn(workflow.run(rx));
            }
            Begin::AlreadyPending => {
                // Dedup-as-confirm: the duplicate trigger counts as a
                // confirming vote for the entry already in flight.
                tracing::info!(action_id = %action.id, user, "Duplicate trigger; confirming existing request");
                self.registry.resolve(
                    &action.id,
                    Resolution::Confirmed {
                        user: user.to_string(),
                    },
                );
                let text = format!(
                    "{}\nSomeone already made that request! Confirming for you...",
                    workflow::prompt_text(user, &action.message)
                );
                self.post(&text, &[]).await;
            }
        }
    }

    async fn run_query(&self, reference: &str) {
        match self.executor.resolve(reference).await {
            Ok((name, entities)) => {
                let text = format!("Here's all you ever wanted to know about {}", name);
                let annotations: Vec<Attachment> = entities
                    .iter()
                    .map(|e| Attachment::text(format!("{}: {}", e.friendly_name, e.state)))
                    .collect();
                self.post(&text, &annotations).await;
            }
            Err(e) => {
                tracing::error!(reference, error = %e, "State query failed");
                self.post(
                    "I'm sorry, I encountered an error trying to get that for you.",
                    &[],
                )
                .await;
            }
        }
    }

    async fn post(&self, text: &str, attachments: &[Attachment]) {
        if let Err(e) = self.chat.post_message(text, attachments).await {
            tracing::warn!(error = %e, "Failed to post reply");
        }
    }
}
