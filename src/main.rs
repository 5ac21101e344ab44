#![recursion_limit = "256"]
//! # Main Entry Point
//!
//! Wires the bot together:
//! - Domain: Configuration, Events and Types
//! - Infrastructure: Matrix, Dice
//! - Application: Event Bus, Command Registry, Parsing, Logging
//! - Interface: Commands and Transport Listeners
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::bus::EventBus;
use crate::application::lifecycle::{ExitHandle, ExitReason};
use crate::application::parsing::ChannelPolicy;
use crate::domain::config::AppConfig;
use crate::domain::events::{self, Payload};
use crate::domain::traits::ChatProvider;
use crate::infrastructure::matrix::MatrixService;
use crate::interface::listeners::{
    ChannelLogger, CommandResponder, InviteListener, LoginErrListener, LoginOkListener,
    MessageListener, StopSyncListener, SyncErrorListener,
};

#[derive(Parser, Debug)]
#[command(version, about = "Dice rolling and tabletop helper bot for Matrix")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "data/config.yaml")]
    config: PathBuf,

    /// Log filter, overrides RUST_LOG and `system.log_level`.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    let guard = application::logging::init(&config.system, cli.log_level.as_deref())?;
    tracing::info!("Starting Tavern...");

    // 3. Bus and Commands
    let bus = EventBus::new();
    let (exit, mut exit_rx) = ExitHandle::new();
    let registry = interface::commands::install(&config);
    tracing::info!(commands = registry.get_commands(true).len(), "Commands installed");
    bus.add_listener(registry);

    // 4. Matrix Setup
    let matrix_config = &config.services.matrix;
    let matrix = MatrixService::connect(matrix_config).await?;
    let chat: Arc<dyn ChatProvider> = Arc::new(matrix.clone());
    let (stop_sync, stop_rx) = StopSyncListener::new();

    bus.add_listener(Arc::new(MessageListener::new(
        config.commands.prefix.clone(),
        ChannelPolicy::from_config(&config.channels)?,
    )));
    bus.add_listener(Arc::new(CommandResponder::new(chat.clone())));
    bus.add_listener(Arc::new(ChannelLogger::info(chat.clone(), config.system.log_channel.clone())));
    bus.add_listener(Arc::new(ChannelLogger::error(chat.clone(), config.system.log_channel.clone())));
    bus.add_listener(Arc::new(LoginOkListener));
    bus.add_listener(Arc::new(LoginErrListener::new(exit.clone())));
    bus.add_listener(Arc::new(SyncErrorListener));
    bus.add_listener(Arc::new(InviteListener::new(chat)));
    bus.add_listener(Arc::new(stop_sync));

    matrix.install_handlers(&bus, &exit, &matrix_config.ignore_senders);

    // 5. Login and Sync
    match matrix.login(matrix_config).await {
        Ok(()) => {
            bus.publish(events::matrix::LOGIN_OK, Payload::Empty);
            matrix.spawn_sync(&bus, stop_rx);
        }
        Err(err) => bus.publish(
            events::matrix::LOGIN_ERR,
            Payload::Failure {
                error: format!("{err:#}"),
            },
        ),
    }

    // 6. Wait for an exit reason
    let reason = tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(err) = res {
                tracing::error!(error = %err, "Failed to listen for ctrl-c");
            }
            ExitReason::Interrupted
        }
        reason = exit_rx.recv() => reason.unwrap_or(ExitReason::ListenerFault),
    };

    tracing::info!(?reason, "Shutting down");
    if let Err(err) = bus.notify(events::SHUTDOWN, Payload::Empty).await {
        tracing::error!(error = %err, "Shutdown listener failed");
    }
    drop(guard);
    std::process::exit(reason.code());
}
