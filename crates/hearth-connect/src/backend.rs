//! Automation backend client.
//!
//! `HomeBackend` is the capability set the engine needs from the
//! home-automation service: fetch current state for one entity and invoke a
//! named service. The production implementation talks to the Home Assistant
//! REST API.

use async_trait::async_trait;
use serde::Deserialize;

use hearth_core::ServiceCall;

use crate::error::ConnectError;

/// Current state of a single entity, as reported by the backend.
///
/// `members` is non-empty only for group entities and preserves the
/// backend's declared member order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityState {
    pub entity_id: String,
    pub friendly_name: String,
    pub state: String,
    pub members: Vec<String>,
}

/// Capability set consumed from the automation backend.
#[async_trait]
pub trait HomeBackend: Send + Sync {
    /// Fetch the current state of one entity by id.
    async fn fetch_state(&self, entity_id: &str) -> Result<EntityState, ConnectError>;

    /// Invoke a named service with its payload. Succeeds or fails whole;
    /// there are no partial results.
    async fn invoke_service(&self, call: &ServiceCall) -> Result<(), ConnectError>;
}

/// Home Assistant REST implementation of [`HomeBackend`].
pub struct HomeAssistantClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    entity_id: String,
    state: String,
    #[serde(default)]
    attributes: StateAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct StateAttributes {
    friendly_name: Option<String>,
    /// For group entities: the ordered member ids.
    #[serde(default)]
    entity_id: Vec<String>,
}

impl HomeAssistantClient {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_token,
        }
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl HomeBackend for HomeAssistantClient {
    async fn fetch_state(&self, entity_id: &str) -> Result<EntityState, ConnectError> {
        let url = format!("{}/api/states/{}", self.base_url, entity_id);
        let response = self.with_auth(self.http.get(&url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectError::Status(status.as_u16()));
        }

        let decoded: StateResponse = response.json().await?;
        let friendly_name = decoded
            .attributes
            .friendly_name
            .unwrap_or_else(|| decoded.entity_id.clone());
        Ok(EntityState {
            entity_id: decoded.entity_id,
            friendly_name,
            state: decoded.state,
            members: decoded.attributes.entity_id,
        })
    }

    async fn invoke_service(&self, call: &ServiceCall) -> Result<(), ConnectError> {
        let url = format!(
            "{}/api/services/{}/{}",
            self.base_url, call.domain, call.service
        );
        let response = self
            .with_auth(self.http.post(&url))
            .json(&call.data)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectError::Status(status.as_u16()));
        }
        tracing::debug!(domain = %call.domain, service = %call.service, "Service invoked");
        Ok(())
    }
}
