//! Delivers `command-result` events back to the chat they came from.

use crate::application::bus::{EventBus, Listener};
use crate::domain::events::{self, Payload};
use crate::domain::traits::ChatProvider;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub struct CommandResponder {
    chat: Arc<dyn ChatProvider>,
}

impl CommandResponder {
    pub fn new(chat: Arc<dyn ChatProvider>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl Listener for CommandResponder {
    fn accept(&self, event_type: &str) -> bool {
        event_type == events::COMMAND_RESULT
    }

    /// Undeliverable results are logged and dropped; they never fail the fan-out.
    async fn notify(&self, payload: &Payload, _bus: &EventBus) -> Result<()> {
        let Payload::CommandResult(result) = payload else {
            tracing::error!(?payload, "Event with no context");
            return Ok(());
        };
        let context = &result.context;
        // The source is not checked, so any origin may answer into the chat.
        let Some(channel) = context.channel.as_deref() else {
            tracing::error!(?context, "Event without a channel context");
            return Ok(());
        };
        if result.content.is_empty() {
            tracing::error!(?context, "Event would have resulted in an empty message; not sending");
            return Ok(());
        }

        let markdown = result.content.to_markdown();
        if let Err(err) = self
            .chat
            .send_message(
                channel,
                &markdown,
                context.message.as_deref(),
                context.thread.as_deref(),
            )
            .await
        {
            tracing::error!(error = %err, channel, "Could not deliver command result");
        }
        Ok(())
    }
}
