//! Shared foundation for Hearth.
//!
//! Configuration loading, the top-level error type, and the value types
//! shared between the engine and the external-service clients.

pub mod config;
pub mod error;
pub mod types;

pub use config::HearthConfig;
pub use error::{HearthError, Result};
pub use types::ServiceCall;
