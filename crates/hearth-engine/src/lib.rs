//! Command engine for Hearth.
//!
//! Matches inbound mention text against the configured command catalog and
//! dispatches to either a read-only state query or a side-effecting action.
//! Sensitive actions pass through the confirmation registry and workflow:
//! an interactive prompt raced against a timeout, with overlapping requests
//! for the same action deduplicated into a single pending entry.

pub mod catalog;
pub mod query;
pub mod registry;
pub mod router;
pub mod workflow;

pub use catalog::{ActionDefinition, CatalogError, Command, CommandCatalog, QueryDefinition};
pub use query::{EntityGroup, StateQueryExecutor, SummarizedEntity};
pub use registry::{Begin, ConfirmationRegistry, Resolution};
pub use router::CommandRouter;
pub use workflow::ConfirmationWorkflow;

#[cfg(test)]
pub(crate) mod testutil;
