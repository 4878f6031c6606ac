//! In-memory fakes for the external collaborators, shared by the engine's
//! unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use hearth_connect::{
    Attachment, ChatClient, ConnectError, EntityState, HomeBackend, MessageRef,
};
use hearth_core::ServiceCall;

/// Recording fake for the chat platform.
#[derive(Clone, Default)]
pub struct MockChat {
    inner: Arc<MockChatInner>,
}

#[derive(Default)]
struct MockChatInner {
    next_ts: AtomicU64,
    posted: Mutex<Vec<(String, Vec<Attachment>)>>,
    updated: Mutex<Vec<(MessageRef, String, Vec<Attachment>)>>,
    fail_post: Mutex<bool>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_posts(&self) {
        *self.inner.fail_post.lock().unwrap() = true;
    }

    pub fn posted(&self) -> Vec<(String, Vec<Attachment>)> {
        self.inner.posted.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<(MessageRef, String, Vec<Attachment>)> {
        self.inner.updated.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for MockChat {
    async fn post_message(
        &self,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<MessageRef, ConnectError> {
        if *self.inner.fail_post.lock().unwrap() {
            return Err(ConnectError::Transport("post failed".to_string()));
        }
        let ts = self.inner.next_ts.fetch_add(1, Ordering::SeqCst);
        self.inner
            .posted
            .lock()
            .unwrap()
            .push((text.to_string(), attachments.to_vec()));
        Ok(MessageRef(format!("{}.000000", ts)))
    }

    async fn update_message(
        &self,
        message: &MessageRef,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<(), ConnectError> {
        self.inner.updated.lock().unwrap().push((
            message.clone(),
            text.to_string(),
            attachments.to_vec(),
        ));
        Ok(())
    }
}

/// Programmable fake for the automation backend.
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<MockBackendInner>,
}

#[derive(Default)]
struct MockBackendInner {
    states: Mutex<HashMap<String, EntityState>>,
    failing: Mutex<HashSet<String>>,
    fetched: Mutex<Vec<String>>,
    invoked: Mutex<Vec<ServiceCall>>,
    fail_invoke: Mutex<bool>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&self, entity_id: &str, friendly_name: &str, state: &str, members: &[&str]) {
        self.inner.states.lock().unwrap().insert(
            entity_id.to_string(),
            EntityState {
                entity_id: entity_id.to_string(),
                friendly_name: friendly_name.to_string(),
                state: state.to_string(),
                members: members.iter().map(|m| m.to_string()).collect(),
            },
        );
    }

    pub fn fail_entity(&self, entity_id: &str) {
        self.inner.failing.lock().unwrap().insert(entity_id.to_string());
    }

    pub fn fail_invocations(&self) {
        *self.inner.fail_invoke.lock().unwrap() = true;
    }

    pub fn fetched(&self) -> Vec<String> {
        self.inner.fetched.lock().unwrap().clone()
    }

    pub fn invoked(&self) -> Vec<ServiceCall> {
        self.inner.invoked.lock().unwrap().clone()
    }
}

#[async_trait]
impl HomeBackend for MockBackend {
    async fn fetch_state(&self, entity_id: &str) -> Result<EntityState, ConnectError> {
        self.inner
            .fetched
            .lock()
            .unwrap()
            .push(entity_id.to_string());
        if self.inner.failing.lock().unwrap().contains(entity_id) {
            return Err(ConnectError::Status(502));
        }
        self.inner
            .states
            .lock()
            .unwrap()
            .get(entity_id)
            .cloned()
            .ok_or(ConnectError::Status(404))
    }

    async fn invoke_service(&self, call: &ServiceCall) -> Result<(), ConnectError> {
        self.inner.invoked.lock().unwrap().push(call.clone());
        if *self.inner.fail_invoke.lock().unwrap() {
            return Err(ConnectError::Status(500));
        }
        Ok(())
    }
}
