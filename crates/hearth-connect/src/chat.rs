//! Chat platform client.
//!
//! `ChatClient` is the narrow capability set the engine needs: post a
//! message into the bot's channel and later update it by reference. The
//! production implementation speaks the Slack Web API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ConnectError;

/// Opaque reference to a posted message, usable for later updates.
///
/// For Slack this is the message timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef(pub String);

/// A button attached to an interactive message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentAction {
    pub name: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl AttachmentAction {
    /// A plain button with the given label and callback value.
    pub fn button(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: "confirm".to_string(),
            text: text.into(),
            kind: "button".to_string(),
            value: value.into(),
            style: None,
        }
    }

    /// Mark the button with the "danger" style.
    pub fn danger(mut self) -> Self {
        self.style = Some("danger".to_string());
        self
    }
}

/// A message annotation, optionally carrying interactive buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<AttachmentAction>,
}

impl Attachment {
    /// A plain text annotation with no buttons.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Capability set consumed from the chat platform.
///
/// The responding channel is fixed at construction; callers never name it.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Post a new message, returning a reference usable for later updates.
    async fn post_message(
        &self,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<MessageRef, ConnectError>;

    /// Replace a previously posted message's text and annotations.
    async fn update_message(
        &self,
        message: &MessageRef,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<(), ConnectError>;
}

/// Slack Web API implementation of [`ChatClient`].
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    channel: String,
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    attachments: &'a [Attachment],
}

#[derive(Debug, Serialize)]
struct UpdateMessageRequest<'a> {
    channel: &'a str,
    ts: &'a str,
    text: &'a str,
    attachments: &'a [Attachment],
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    ts: Option<String>,
    error: Option<String>,
}

impl SlackClient {
    pub fn new(api_base: impl Into<String>, bot_token: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            bot_token: bot_token.into(),
            channel: channel.into(),
        }
    }

    async fn call(&self, method: &str, body: &impl Serialize) -> Result<SlackResponse, ConnectError> {
        let url = format!("{}/{}", self.api_base, method);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.bot_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectError::Status(status.as_u16()));
        }

        let decoded: SlackResponse = response.json().await?;
        if !decoded.ok {
            return Err(ConnectError::Rejected(
                decoded.error.unwrap_or_else(|| "unknown".to_string()),
            ));
        }
        Ok(decoded)
    }
}

#[async_trait]
impl ChatClient for SlackClient {
    async fn post_message(
        &self,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<MessageRef, ConnectError> {
        let request = PostMessageRequest {
            channel: &self.channel,
            text,
            attachments,
        };
        let response = self.call("chat.postMessage", &request).await?;
        let ts = response
            .ts
            .ok_or_else(|| ConnectError::Decode("chat.postMessage response missing ts".to_string()))?;
        tracing::debug!(ts = %ts, "Message posted");
        Ok(MessageRef(ts))
    }

    async fn update_message(
        &self,
        message: &MessageRef,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<(), ConnectError> {
        let request = UpdateMessageRequest {
            channel: &self.channel,
            ts: &message.0,
            text,
            attachments,
        };
        self.call("chat.update", &request).await?;
        tracing::debug!(ts = %message.0, "Message updated");
        Ok(())
    }
}
