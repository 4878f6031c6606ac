//! The state query executor.
//!
//! Resolves a configured entity-or-group reference to fresh backend state.
//! Nothing here is cached; every query hits the backend again.

use std::sync::Arc;

use hearth_connect::{ConnectError, HomeBackend};

/// Read-only projection of one entity's current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizedEntity {
    pub entity_id: String,
    pub friendly_name: String,
    pub state: String,
}

/// Read-only projection of a group and its members, in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityGroup {
    pub entity_id: String,
    pub friendly_name: String,
    pub entities: Vec<SummarizedEntity>,
}

/// Resolves query references against the automation backend.
pub struct StateQueryExecutor {
    backend: Arc<dyn HomeBackend>,
}

impl StateQueryExecutor {
    pub fn new(backend: Arc<dyn HomeBackend>) -> Self {
        Self { backend }
    }

    /// Resolve a reference to a display name and the entities behind it.
    ///
    /// Group references expand to their members, fetched one at a time in
    /// the backend's declared order. Any single failure aborts the whole
    /// resolution; no partial results are returned.
    pub async fn resolve(
        &self,
        reference: &str,
    ) -> Result<(String, Vec<SummarizedEntity>), ConnectError> {
        if is_group(reference) {
            let group = self.fetch_group(reference).await?;
            Ok((group.friendly_name, group.entities))
        } else {
            let entity = self.fetch_entity(reference).await?;
            Ok((entity.friendly_name.clone(), vec![entity]))
        }
    }

    async fn fetch_entity(&self, entity_id: &str) -> Result<SummarizedEntity, ConnectError> {
        let state = self.backend.fetch_state(entity_id).await?;
        Ok(SummarizedEntity {
            entity_id: state.entity_id,
            friendly_name: state.friendly_name,
            state: state.state,
        })
    }

    async fn fetch_group(&self, group_id: &str) -> Result<EntityGroup, ConnectError> {
        let group_state = self.backend.fetch_state(group_id).await?;

        let mut entities = Vec::with_capacity(group_state.members.len());
        for member_id in &group_state.members {
            entities.push(self.fetch_entity(member_id).await?);
        }

        Ok(EntityGroup {
            entity_id: group_state.entity_id,
            friendly_name: group_state.friendly_name,
            entities,
        })
    }
}

/// Whether a reference denotes a group entity.
fn is_group(reference: &str) -> bool {
    reference.contains("group.")
}
