//! Lunar Sync - terminal client
//!
//! Follows a lunar-phase game on a server, animating scoring events into the
//! log, or issues one-off requests.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use lunar_core::PhaseValue;
use lunar_sync::{
    console, ClientConfig, ControlAction, GameApi, MoveClient, RestGameApi, StatePoller, SyncDriver,
    TracingSurface,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::load_or_default(&cli.config)?
        .with_env_overrides()?
        .with_overrides(cli.server_url, cli.player)?;

    info!(
        server_url = %config.server_url(),
        player = %config.player(),
        "Lunar Sync starting"
    );

    let api = Arc::new(RestGameApi::new(config.server_url(), *config.player()));

    match cli.command {
        Command::Watch { no_animations } => {
            let config = if no_animations {
                config.with_animations(false)
            } else {
                config
            };
            run_watch(config, api).await
        }
        Command::State => print_state(api).await,
        Command::Place { node, value } => place(config, api, node, value).await,
        Command::Reset => control(api, ControlAction::Reset).await,
        Command::Undo => control(api, ControlAction::Undo).await,
        Command::Redo => control(api, ControlAction::Redo).await,
    }
}

/// Runs the driver with the polling push source and stdin commands.
#[instrument(skip_all)]
async fn run_watch(config: ClientConfig, api: Arc<RestGameApi>) -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let api: Arc<dyn GameApi> = api;

    let mut driver = SyncDriver::new(&config, TracingSurface::new(), Arc::clone(&api), rx);
    driver.load().await.context("Initial load failed")?;

    let poller = StatePoller::new(Arc::clone(&api), tx.clone(), config.poll_interval());
    let poll_task = tokio::spawn(poller.run());
    let console_task = tokio::spawn(console::read_stdin(tx));

    driver.run().await;

    poll_task.abort();
    console_task.abort();
    info!("Bye");
    Ok(())
}

async fn print_state(api: Arc<RestGameApi>) -> Result<()> {
    let state = api.fetch_state().await?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

async fn place(config: ClientConfig, api: Arc<RestGameApi>, node: String, value: u8) -> Result<()> {
    let value = PhaseValue::new(value).context("Card value must be 0-7")?;
    let client = MoveClient::new(api, *config.player());
    let outcome = client.submit(node.into(), value).await?;

    if !*outcome.accepted() {
        anyhow::bail!("Move rejected: {}", outcome.rejection_message());
    }
    for event in outcome.events() {
        info!(kind = event.kind(), player = ?event.player(), "Scored");
    }
    if *outcome.game_over() {
        info!("Game over");
    }
    Ok(())
}

async fn control(api: Arc<RestGameApi>, action: ControlAction) -> Result<()> {
    let response = api.control(action).await?;
    if !response.success {
        anyhow::bail!(
            "{}",
            response
                .error
                .unwrap_or_else(|| action.failure_message().to_string())
        );
    }
    info!(action = %action, "Done");
    Ok(())
}
