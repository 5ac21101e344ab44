//! Mirrors `info` and `error` notices into the configured log room.

use crate::application::bus::{EventBus, Listener};
use crate::domain::events::{self, Payload};
use crate::domain::traits::ChatProvider;
use crate::strings::messages;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// One instance per notice type; the tag decides the icon.
pub struct ChannelLogger {
    event_type: &'static str,
    chat: Arc<dyn ChatProvider>,
    log_channel: Option<String>,
}

impl ChannelLogger {
    pub fn info(chat: Arc<dyn ChatProvider>, log_channel: Option<String>) -> Self {
        Self {
            event_type: events::INFO,
            chat,
            log_channel,
        }
    }

    pub fn error(chat: Arc<dyn ChatProvider>, log_channel: Option<String>) -> Self {
        Self {
            event_type: events::ERROR,
            chat,
            log_channel,
        }
    }
}

#[async_trait]
impl Listener for ChannelLogger {
    fn accept(&self, event_type: &str) -> bool {
        event_type == self.event_type
    }

    async fn notify(&self, payload: &Payload, _bus: &EventBus) -> Result<()> {
        let Payload::Log { msg } = payload else {
            tracing::error!(?payload, "Log event with no message");
            return Ok(());
        };
        let Some(channel) = self.log_channel.as_deref() else {
            tracing::debug!(msg = %msg, "Ignore log event; no log channel is configured");
            return Ok(());
        };

        let notice = messages::log_notice(self.event_type == events::ERROR, msg);
        if let Err(err) = self.chat.send_message(channel, &notice, None, None).await {
            tracing::error!(error = %err, channel, msg = %msg, "Could not post to log channel");
        }
        Ok(())
    }
}
