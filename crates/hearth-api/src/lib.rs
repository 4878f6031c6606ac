//! Webhook surface for the chat automation bot.
//!
//! Exposes the Events API endpoint, the interactive-button callback
//! endpoint, and a health probe, all backed by the shared
//! [`CommandRouter`](hearth_engine::CommandRouter).

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
