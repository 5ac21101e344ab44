//! Inbound chat messages become `command` events.

use crate::application::bus::{EventBus, Listener};
use crate::application::parsing::{ChannelPolicy, parse_command};
use crate::domain::context::{Context, SOURCE_MATRIX};
use crate::domain::events::{self, Payload};
use crate::domain::types::{ChannelKind, CommandRequest, IncomingMessage};
use anyhow::Result;
use async_trait::async_trait;

pub struct MessageListener {
    prefix: String,
    policy: ChannelPolicy,
}

impl MessageListener {
    pub fn new(prefix: impl Into<String>, policy: ChannelPolicy) -> Self {
        Self {
            prefix: prefix.into(),
            policy,
        }
    }

    /// Bots, refused channels and plain chatter yield `None`.
    pub fn to_request(&self, message: &IncomingMessage) -> Option<CommandRequest> {
        if message.sender_is_bot || !self.policy.admits(&message.channel) {
            return None;
        }
        let (command, args) = parse_command(&message.text, &self.prefix)?;

        let mut context = Context::new(SOURCE_MATRIX, message.timestamp)
            .with_channel(&message.channel.id)
            .with_message(&message.id)
            .with_author(&message.sender);
        if let Some(root) = &message.channel.thread {
            context = context.with_thread(root);
        }
        if message.channel.kind == ChannelKind::Group {
            context = context.with_member(&message.sender);
        }
        Some(CommandRequest {
            command,
            args,
            context,
        })
    }
}

#[async_trait]
impl Listener for MessageListener {
    fn accept(&self, event_type: &str) -> bool {
        event_type == events::matrix::MESSAGE
    }

    async fn notify(&self, payload: &Payload, bus: &EventBus) -> Result<()> {
        let Payload::Message(message) = payload else {
            tracing::error!(?payload, "Message event without a message");
            return Ok(());
        };
        tracing::trace!(id = %message.id, sender = %message.sender, "Message");
        match self.to_request(message) {
            Some(request) => bus.notify(events::COMMAND, Payload::Command(request)).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::ChannelsConfig;
    use crate::domain::types::ChannelInfo;
    use std::sync::{Arc, Mutex};

    fn listener() -> MessageListener {
        MessageListener::new("!", ChannelPolicy::from_config(&ChannelsConfig::default()).unwrap())
    }

    fn message(text: &str, kind: ChannelKind, name: Option<&str>) -> IncomingMessage {
        IncomingMessage {
            id: "$msg".into(),
            text: text.into(),
            sender: "@alice:example.org".into(),
            sender_is_bot: false,
            channel: ChannelInfo {
                id: "!room:example.org".into(),
                name: name.map(str::to_string),
                kind,
                thread: None,
            },
            timestamp: 1_623_705_300_000,
        }
    }

    #[test]
    fn test_group_message_builds_full_context() {
        let request = listener()
            .to_request(&message("!Roll 1d20 # hi", ChannelKind::Group, Some("dice-room")))
            .unwrap();
        assert_eq!(request.command, "roll");
        assert_eq!(request.args, vec!["1d20", "#", "hi"]);
        assert_eq!(
            request.context,
            Context::new("matrix", 1_623_705_300_000)
                .with_channel("!room:example.org")
                .with_message("$msg")
                .with_author("@alice:example.org")
                .with_member("@alice:example.org")
        );
    }

    #[test]
    fn test_direct_message_has_no_member() {
        let request = listener()
            .to_request(&message("!help", ChannelKind::Direct, None))
            .unwrap();
        assert_eq!(request.context.member, None);
        assert_eq!(request.context.user_key(), "A:@alice:example.org");
    }

    #[test]
    fn test_thread_message_keeps_root() {
        let mut threaded = message("!roll 2d6", ChannelKind::Group, Some("general"));
        threaded.channel.thread = Some("$root".into());
        let request = listener().to_request(&threaded).unwrap();
        assert_eq!(request.context.thread.as_deref(), Some("$root"));
        assert_eq!(request.context.message.as_deref(), Some("$msg"));

        let plain = listener()
            .to_request(&message("!roll", ChannelKind::Group, Some("dice")))
            .unwrap();
        assert_eq!(plain.context.thread, None);
    }

    #[test]
    fn test_filters() {
        let l = listener();
        let mut bot = message("!help", ChannelKind::Group, Some("bot-spam"));
        bot.sender_is_bot = true;
        assert!(l.to_request(&bot).is_none());
        assert!(l.to_request(&message("!help", ChannelKind::Group, Some("general"))).is_none());
        assert!(l.to_request(&message("! help", ChannelKind::Group, Some("dice"))).is_none());
        assert!(l.to_request(&message("help", ChannelKind::Group, Some("dice"))).is_none());
        assert!(l.to_request(&message("!help", ChannelKind::NonText, Some("dice"))).is_none());
    }

    struct Commands(Mutex<Vec<CommandRequest>>);

    #[async_trait]
    impl Listener for Commands {
        fn accept(&self, event_type: &str) -> bool {
            event_type == events::COMMAND
        }

        async fn notify(&self, payload: &Payload, _bus: &EventBus) -> Result<()> {
            if let Payload::Command(request) = payload {
                self.0.lock().unwrap().push(request.clone());
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_publishes_command() {
        let bus = EventBus::new();
        let commands = Arc::new(Commands(Mutex::new(Vec::new())));
        bus.add_listener(commands.clone());
        bus.add_listener(Arc::new(listener()));

        let incoming = message("!!", ChannelKind::Group, Some("roll"));
        bus.notify(events::matrix::MESSAGE, Payload::Message(incoming))
            .await
            .unwrap();
        bus.notify(
            events::matrix::MESSAGE,
            Payload::Message(message("hello", ChannelKind::Group, Some("roll"))),
        )
        .await
        .unwrap();

        let seen = commands.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].command, "!");
        assert!(seen[0].args.is_empty());
    }
}
