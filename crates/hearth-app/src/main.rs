//! Hearth application binary - composition root.
//!
//! Ties together all Hearth crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Compile the command catalog (fatal on bad patterns or duplicate ids)
//! 3. Build the chat and backend clients
//! 4. Start the axum webhook server

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use hearth_api::AppState;
use hearth_connect::{HomeAssistantClient, SlackClient};
use hearth_core::HearthConfig;
use hearth_engine::{CommandCatalog, CommandRouter, ConfirmationRegistry};

#[derive(Debug, Parser)]
#[command(name = "hearth", about = "Chat-driven home automation bot", version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the configured listen port.
    #[arg(short, long)]
    port: Option<u16>,
}

/// Resolve the config file path (CLI flag, HEARTH_CONFIG env, or
/// ~/.hearth/config.toml).
fn config_path(cli: &Cli) -> PathBuf {
    if let Some(p) = &cli.config {
        return p.clone();
    }
    if let Ok(p) = std::env::var("HEARTH_CONFIG") {
        return PathBuf::from(p);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".hearth").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Config first; its log level seeds the tracing filter.
    let config_file = config_path(&cli);
    let config = match HearthConfig::load(&config_file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config {}: {}", config_file.display(), e);
            return Err(e.into());
        }
    };

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Hearth v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Catalog. Bad patterns and duplicate ids are startup-fatal.
    let catalog = CommandCatalog::from_config(&config.actions, &config.queries)?;
    tracing::info!(
        actions = config.actions.len(),
        queries = config.queries.len(),
        "Command catalog compiled"
    );

    // External clients.
    let chat = Arc::new(SlackClient::new(
        &config.chat.api_base,
        &config.chat.bot_token,
        &config.chat.channel,
    ));
    let backend = Arc::new(HomeAssistantClient::new(
        &config.backend.base_url,
        config.backend.api_token.clone(),
    ));

    let registry = Arc::new(ConfirmationRegistry::new());
    let router = CommandRouter::new(
        catalog,
        registry,
        chat,
        backend,
        Duration::from_secs(config.workflow.confirm_timeout_secs),
    );

    let state = AppState::new(
        Arc::new(router),
        config.chat.verification_token.clone(),
        config.chat.channel.clone(),
    );

    let port = cli.port.unwrap_or(config.general.port);
    hearth_api::start_server(port, state).await?;

    Ok(())
}
