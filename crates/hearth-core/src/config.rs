use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::types::ServiceCall;

/// Top-level configuration for the Hearth bot.
///
/// Loaded once at startup from a TOML document and immutable thereafter.
/// The `actions` and `queries` tables are the command catalog source; they
/// are validated (pattern compilation, duplicate ids) when the catalog is
/// built, and any problem there is startup-fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearthConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub actions: Vec<ActionEntry>,
    #[serde(default)]
    pub queries: Vec<QueryEntry>,
}

impl Default for HearthConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            chat: ChatConfig::default(),
            backend: BackendConfig::default(),
            workflow: WorkflowConfig::default(),
            actions: Vec::new(),
            queries: Vec::new(),
        }
    }
}

impl HearthConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HearthConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Port for the webhook endpoints.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            log_level: "info".to_string(),
        }
    }
}

/// Chat platform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Bot token for posting and updating messages.
    pub bot_token: String,
    /// Verification token expected on inbound webhook payloads.
    pub verification_token: String,
    /// The single channel the bot responds in. Mentions elsewhere are ignored.
    pub channel: String,
    /// Chat API base URL. Overridable for tests.
    pub api_base: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            verification_token: String::new(),
            channel: String::new(),
            api_base: "https://slack.com/api".to_string(),
        }
    }
}

/// Automation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the automation backend, e.g. `http://127.0.0.1:8123`.
    pub base_url: String,
    /// Optional bearer token for the backend API.
    pub api_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8123".to_string(),
            api_token: None,
        }
    }
}

/// Confirmation workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// How long a confirmable action waits for a resolution before the
    /// timer fires.
    pub confirm_timeout_secs: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            confirm_timeout_secs: 30,
        }
    }
}

/// One configured action: a pattern that triggers a backend service call,
/// optionally gated by interactive confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEntry {
    pub id: String,
    /// Regex matched against the incoming mention text.
    pub pattern: String,
    /// Human-readable description shown in chat.
    pub message: String,
    #[serde(default)]
    pub requires_confirm: bool,
    /// Effect invoked when the action is confirmed (or runs unconfirmed).
    pub on_confirm: ServiceCall,
    /// Optional effect invoked when the action is cancelled.
    #[serde(default)]
    pub on_cancel: Option<ServiceCall>,
}

/// One configured query: a pattern that triggers a read-only state fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryEntry {
    pub id: String,
    /// Regex matched against the incoming mention text.
    pub pattern: String,
    /// Entity or group reference to resolve, e.g. `group.living_room`.
    pub entity: String,
}
