//! Client lifecycle glue: login outcome, sync failures, invites and stopping the sync loop.

use crate::application::bus::{EventBus, Listener};
use crate::application::lifecycle::{ExitHandle, ExitReason};
use crate::domain::events::{self, Payload};
use crate::domain::traits::ChatProvider;
use crate::strings::messages;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

fn log(msg: impl Into<String>) -> Payload {
    Payload::Log { msg: msg.into() }
}

/// Announces the login and raises `startup`.
pub struct LoginOkListener;

#[async_trait]
impl Listener for LoginOkListener {
    fn accept(&self, event_type: &str) -> bool {
        event_type == events::matrix::LOGIN_OK
    }

    async fn notify(&self, _payload: &Payload, bus: &EventBus) -> Result<()> {
        tracing::info!("{}", messages::LOGGED_IN);
        bus.notify(events::INFO, log(messages::LOGGED_IN)).await?;
        bus.notify(events::STARTUP, Payload::Empty).await
    }
}

/// A failed login ends the process with code 1.
pub struct LoginErrListener {
    exit: ExitHandle,
}

impl LoginErrListener {
    pub fn new(exit: ExitHandle) -> Self {
        Self { exit }
    }
}

#[async_trait]
impl Listener for LoginErrListener {
    fn accept(&self, event_type: &str) -> bool {
        event_type == events::matrix::LOGIN_ERR
    }

    async fn notify(&self, payload: &Payload, _bus: &EventBus) -> Result<()> {
        tracing::error!(?payload, "Client initialisation failed");
        self.exit.request(ExitReason::LoginFailed);
        Ok(())
    }
}

pub struct SyncErrorListener;

#[async_trait]
impl Listener for SyncErrorListener {
    fn accept(&self, event_type: &str) -> bool {
        event_type == events::matrix::SYNC_ERR
    }

    async fn notify(&self, payload: &Payload, bus: &EventBus) -> Result<()> {
        let error = match payload {
            Payload::Failure { error } => error.as_str(),
            _ => "unknown",
        };
        tracing::error!(error, "Client error");
        bus.notify(events::ERROR, log(messages::client_error(error)))
            .await
    }
}

/// Joins every room the bot is invited to.
pub struct InviteListener {
    chat: Arc<dyn ChatProvider>,
}

impl InviteListener {
    pub fn new(chat: Arc<dyn ChatProvider>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl Listener for InviteListener {
    fn accept(&self, event_type: &str) -> bool {
        event_type == events::matrix::INVITE
    }

    async fn notify(&self, payload: &Payload, bus: &EventBus) -> Result<()> {
        let Payload::Room { id, name } = payload else {
            tracing::error!(?payload, "Invite without a room");
            return Ok(());
        };
        match self.chat.join_channel(id).await {
            Ok(()) => {
                tracing::info!(id = %id, name = ?name, "Rooms changed");
                bus.notify(events::INFO, log(messages::invited(name.as_deref(), id)))
                    .await
            }
            Err(err) => {
                tracing::error!(id = %id, error = %err, "Failed to join room");
                bus.notify(events::ERROR, log(messages::join_failed(id, &err)))
                    .await
            }
        }
    }
}

/// Flips the sync loop's stop flag on `shutdown`.
pub struct StopSyncListener {
    stop: watch::Sender<bool>,
}

impl StopSyncListener {
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (stop, rx) = watch::channel(false);
        (Self { stop }, rx)
    }
}

#[async_trait]
impl Listener for StopSyncListener {
    fn accept(&self, event_type: &str) -> bool {
        event_type == events::SHUTDOWN
    }

    async fn notify(&self, _payload: &Payload, _bus: &EventBus) -> Result<()> {
        tracing::info!("Closing down");
        self.stop.send_replace(true);
        Ok(())
    }
}
