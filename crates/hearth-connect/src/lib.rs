//! External collaborators for Hearth.
//!
//! The chat platform and the automation backend live behind narrow async
//! traits so the engine can be exercised against in-memory fakes. The
//! production implementations here are thin reqwest clients.

pub mod backend;
pub mod chat;
pub mod error;

pub use backend::{EntityState, HomeAssistantClient, HomeBackend};
pub use chat::{Attachment, AttachmentAction, ChatClient, MessageRef, SlackClient};
pub use error::ConnectError;
