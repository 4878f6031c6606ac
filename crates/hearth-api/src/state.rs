//! Application state shared across all route handlers.
//!
//! AppState holds the command router plus the inbound-verification
//! settings. It is passed to handlers via axum's State extractor.

use std::sync::Arc;

use hearth_engine::CommandRouter;

/// Shared application state.
///
/// Cheap to clone; the router is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The command router handling mentions and button presses.
    pub router: Arc<CommandRouter>,
    /// Token every inbound chat payload must carry.
    pub verification_token: String,
    /// The only channel whose mentions are dispatched.
    pub channel: String,
}

impl AppState {
    pub fn new(router: Arc<CommandRouter>, verification_token: String, channel: String) -> Self {
        Self {
            router,
            verification_token,
            channel,
        }
    }
}
