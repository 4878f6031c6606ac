//! Value types shared between the engine and the external-service clients.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A backend service invocation: the follow-up effect attached to an action.
///
/// `data` is a small key-value payload forwarded verbatim to the automation
/// backend (entity ids, brightness values, and the like).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl ServiceCall {
    /// Create a call with no payload.
    pub fn new(domain: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            service: service.into(),
            data: BTreeMap::new(),
        }
    }

    /// Add a key-value pair to the payload.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}
