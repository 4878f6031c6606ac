//! Route handler functions for the webhook endpoints.
//!
//! Each handler decodes the chat platform's wire payload, enforces the
//! verification token, and hands accepted work to the command router.
//! Event dispatch runs in a spawned task so the webhook replies within
//! the platform's delivery deadline.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Wire types
// =============================================================================

/// Outer Events API envelope. `url_verification` carries a challenge;
/// `event_callback` wraps an inner event.
#[derive(Debug, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub token: String,
    pub challenge: Option<String>,
    pub event: Option<InnerEvent>,
}

/// The event inside an `event_callback` envelope.
#[derive(Debug, Deserialize)]
pub struct InnerEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub channel: String,
}

/// Form body of an interactive message callback: a single `payload`
/// field holding the interaction JSON.
#[derive(Debug, Deserialize)]
pub struct InteractionForm {
    pub payload: String,
}

#[derive(Debug, Deserialize)]
pub struct InteractionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub callback_id: String,
    pub user: InteractionUser,
    #[serde(default)]
    pub actions: Vec<InteractionAction>,
    pub original_message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct InteractionUser {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct InteractionAction {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// POST /events - the Events API webhook.
///
/// Replies immediately; matched mentions are dispatched on a spawned task.
pub async fn events(State(state): State<AppState>, body: String) -> Result<Response, ApiError> {
    let envelope: EventEnvelope = serde_json::from_str(&body)
        .map_err(|e| ApiError::BadRequest(format!("Undecodable event payload: {}", e)))?;

    match envelope.kind.as_str() {
        "url_verification" => {
            let challenge = envelope
                .challenge
                .ok_or_else(|| ApiError::BadRequest("Missing challenge".to_string()))?;
            Ok(challenge.into_response())
        }
        "event_callback" => {
            if envelope.token != state.verification_token {
                tracing::warn!("Event token mismatch");
                return Err(ApiError::Unauthorized("Token mismatch".to_string()));
            }
            if let Some(event) = envelope.event {
                if event.kind == "app_mention" && event.channel == state.channel {
                    tracing::info!(user = %event.user, channel = %event.channel, "Got app mention");
                    let router = state.router.clone();
                    tokio::spawn(async move {
                        router.dispatch(&event.text, &event.user).await;
                    });
                }
            }
            Ok(StatusCode::OK.into_response())
        }
        other => {
            tracing::debug!(kind = other, "Ignoring event envelope");
            Ok(StatusCode::OK.into_response())
        }
    }
}

/// POST /interactions - interactive button callbacks.
pub async fn interactions(
    State(state): State<AppState>,
    Form(form): Form<InteractionForm>,
) -> Result<Response, ApiError> {
    let payload: InteractionPayload = serde_json::from_str(&form.payload)
        .map_err(|e| ApiError::BadRequest(format!("Undecodable interaction payload: {}", e)))?;

    if payload.token != state.verification_token {
        tracing::warn!("Interaction token mismatch");
        return Err(ApiError::Unauthorized("Token mismatch".to_string()));
    }

    if payload.kind != "interactive_message" {
        return Err(ApiError::BadRequest(format!(
            "Unknown interaction type {}",
            payload.kind
        )));
    }

    let approved = payload
        .actions
        .first()
        .map(|a| a.value == "yes")
        .ok_or_else(|| ApiError::BadRequest("Interaction carries no action".to_string()))?;

    tracing::info!(callback_id = %payload.callback_id, user = %payload.user.id, approved, "Reply received");

    if state
        .router
        .resolve_interaction(&payload.callback_id, &payload.user.id, approved)
    {
        return Ok(StatusCode::OK.into_response());
    }

    // Nothing pending: the press came after the request already reached a
    // terminal state. Replace the prompt so the buttons disappear.
    let mut replacement = payload.original_message.unwrap_or_else(|| json!({}));
    replacement["text"] = json!("I'm not quite sure what you just replied to...");
    replacement["attachments"] = json!([]);
    Ok(Json(replacement).into_response())
}
