//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using the `matrix_sdk`.
//! Also owns the client lifecycle: login, the sync loop and translating room events into
//! platform-neutral bus events. Nothing outside this module touches `matrix_sdk` types.

use crate::application::bus::EventBus;
use crate::application::lifecycle::{ExitHandle, ExitReason};
use crate::domain::config::MatrixConfig;
use crate::domain::events::{self, Payload};
use crate::domain::traits::ChatProvider;
use crate::domain::types::{ChannelInfo, ChannelKind, IncomingMessage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use matrix_sdk::config::SyncSettings;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::events::relation::{InReplyTo, Thread};
use matrix_sdk::ruma::events::room::member::{MembershipState, StrippedRoomMemberEvent};
use matrix_sdk::ruma::events::room::message::{
    MessageType, Relation, RoomMessageEventContent, SyncRoomMessageEvent,
};
use matrix_sdk::ruma::{EventId, RoomId};
use matrix_sdk::Client;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone)]
pub struct MatrixService {
    client: Client,
}

impl MatrixService {
    pub async fn connect(config: &MatrixConfig) -> Result<Self> {
        let client = Client::builder()
            .homeserver_url(&config.homeserver)
            .build()
            .await
            .with_context(|| format!("Failed to build client for {}", config.homeserver))?;
        Ok(Self { client })
    }

    pub async fn login(&self, config: &MatrixConfig) -> Result<()> {
        self.client
            .matrix_auth()
            .login_username(&config.username, &config.password)
            .initial_device_display_name(config.display_name.as_deref().unwrap_or("tavern"))
            .send()
            .await?;
        tracing::info!("Logged in as {}", config.username);

        if let Some(name) = &config.display_name {
            if let Err(err) = self.client.account().set_display_name(Some(name.as_str())).await {
                tracing::warn!(error = %err, "Failed to set display name");
            }
        }
        Ok(())
    }

    /// Translate room traffic into `matrix-message` and `matrix-invite` events.
    ///
    /// Messages sent before this call are skipped so a restart does not replay history.
    pub fn install_handlers(&self, bus: &EventBus, exit: &ExitHandle, ignore: &[String]) {
        let start_ms = chrono::Utc::now().timestamp_millis();
        let ignore: Arc<Vec<String>> = Arc::new(ignore.to_vec());

        let message_bus = bus.clone();
        let message_exit = exit.clone();
        self.client
            .add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
                let bus = message_bus.clone();
                let exit = message_exit.clone();
                let ignore = ignore.clone();
                async move {
                    let Some(message) = incoming(&ev, &room, &ignore, start_ms).await else {
                        return;
                    };
                    if let Err(err) = bus.notify(events::matrix::MESSAGE, Payload::Message(message)).await {
                        tracing::error!(error = %err, "Message listener failed");
                        exit.request(ExitReason::ListenerFault);
                    }
                }
            });

        let invite_bus = bus.clone();
        self.client
            .add_event_handler(move |ev: StrippedRoomMemberEvent, room: Room| {
                let bus = invite_bus.clone();
                async move {
                    if ev.content.membership != MembershipState::Invite
                        || ev.state_key != room.own_user_id()
                    {
                        return;
                    }
                    tracing::info!(room = %room.room_id(), sender = %ev.sender, "Invited");
                    bus.publish(
                        events::matrix::INVITE,
                        Payload::Room {
                            id: room.room_id().to_string(),
                            name: room.name(),
                        },
                    );
                }
            });
    }

    /// Run the sync loop until it fails or `stop` changes.
    pub fn spawn_sync(&self, bus: &EventBus, mut stop: watch::Receiver<bool>) {
        let client = self.client.clone();
        let bus = bus.clone();
        tokio::spawn(async move {
            tokio::select! {
                res = client.sync(SyncSettings::default()) => {
                    if let Err(err) = res {
                        tracing::error!(error = %err, "Matrix sync failed");
                        bus.publish(events::matrix::SYNC_ERR, Payload::Failure { error: err.to_string() });
                    }
                }
                _ = stop.changed() => {
                    tracing::info!("Matrix sync stopped");
                }
            }
        });
    }
}

/// `None` for anything that is not a fresh text message.
async fn incoming(
    ev: &SyncRoomMessageEvent,
    room: &Room,
    ignore: &[String],
    start_ms: i64,
) -> Option<IncomingMessage> {
    let original = ev.as_original()?;
    let timestamp = u64::from(ev.origin_server_ts().get()) as i64;
    if timestamp < start_ms {
        return None;
    }
    let MessageType::Text(text) = &original.content.msgtype else {
        return None;
    };

    let sender = original.sender.as_str();
    let sender_is_bot =
        original.sender == room.own_user_id() || ignore.iter().any(|id| id == sender);
    let thread = match &original.content.relates_to {
        Some(Relation::Thread(thread)) => Some(thread.event_id.to_string()),
        _ => None,
    };
    let kind = if room.is_space() {
        ChannelKind::NonText
    } else if room.is_direct().await.unwrap_or(false) {
        ChannelKind::Direct
    } else {
        ChannelKind::Group
    };

    Some(IncomingMessage {
        id: original.event_id.to_string(),
        text: text.body.clone(),
        sender: sender.to_string(),
        sender_is_bot,
        channel: ChannelInfo {
            id: room.room_id().to_string(),
            name: room.name(),
            kind,
            thread,
        },
        timestamp,
    })
}

#[async_trait]
impl ChatProvider for MatrixService {
    async fn send_message(
        &self,
        channel: &str,
        content: &str,
        reply_to: Option<&str>,
        thread: Option<&str>,
    ) -> Result<String, String> {
        let room_id = <&RoomId>::try_from(channel).map_err(|e| e.to_string())?;
        let room = self
            .client
            .get_room(room_id)
            .ok_or_else(|| format!("Not in room {channel}"))?;

        let event_id = |id: &str| {
            <&EventId>::try_from(id)
                .map(ToOwned::to_owned)
                .map_err(|e| e.to_string())
        };
        let mut message = RoomMessageEventContent::text_markdown(content);
        message.relates_to = match (thread, reply_to) {
            (Some(root), Some(reply_to)) => {
                Some(Relation::Thread(Thread::reply(event_id(root)?, event_id(reply_to)?)))
            }
            (Some(root), None) => Some(Relation::Thread(Thread::without_fallback(event_id(root)?))),
            (None, Some(reply_to)) => Some(Relation::Reply {
                in_reply_to: InReplyTo::new(event_id(reply_to)?),
            }),
            (None, None) => None,
        };

        tracing::debug!("Bot sending message to {}: {}", channel, content);
        room.send(message)
            .await
            .map(|resp| resp.event_id.to_string())
            .map_err(|e| e.to_string())
    }

    async fn join_channel(&self, channel: &str) -> Result<(), String> {
        let room_id = <&RoomId>::try_from(channel).map_err(|e| e.to_string())?;
        self.client
            .join_room_by_id(room_id)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
