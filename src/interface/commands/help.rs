//! # Help Command
//!
//! Handles the `help` command.
//! Lists every visible enabled command, at most once a minute per user. Requests inside the
//! cooldown are dropped without a reply.

use crate::application::bus::EventBus;
use crate::application::registry::{Command, CommandRegistry};
use crate::domain::config::AppConfig;
use crate::domain::content::{Embed, EmbedField};
use crate::domain::context::Context;
use crate::interface::commands::reply;
use crate::strings;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;

/// Milliseconds between two listings for the same user.
pub const COOLDOWN_MS: i64 = 60_000;

pub fn register(registry: &Arc<CommandRegistry>, config: &AppConfig) {
    registry.add_command(Arc::new(HelpCommand::new(
        Arc::downgrade(registry),
        &config.commands.prefix,
    )));
}

pub struct HelpCommand {
    registry: Weak<CommandRegistry>,
    description: String,
    last_help: Mutex<HashMap<String, i64>>,
}

impl HelpCommand {
    pub fn new(registry: Weak<CommandRegistry>, prefix: &str) -> Self {
        Self {
            registry,
            description: strings::help::help(prefix),
            last_help: Mutex::new(HashMap::new()),
        }
    }

    /// Records `now` and returns true if the user is out of cooldown.
    async fn take_slot(&self, key: &str, now: i64) -> bool {
        let mut last_help = self.last_help.lock().await;
        let last = last_help.entry(key.to_string()).or_insert(0);
        let cooldown = now - *last > COOLDOWN_MS;
        tracing::debug!(member_or_author = key, command = "help", cooldown);
        if cooldown {
            *last = now;
        }
        cooldown
    }
}

fn listing(registry: &CommandRegistry) -> Embed {
    Embed {
        title: Some(strings::help::TITLE.to_string()),
        url: Some(strings::help::URL.to_string()),
        description: Some(strings::help::DESCRIPTION.to_string()),
        fields: registry
            .get_commands(false)
            .iter()
            .map(|command| {
                EmbedField::new(
                    format!(
                        "{} {}",
                        command.icon().unwrap_or(strings::help::DEFAULT_ICON),
                        command.name()
                    ),
                    command.description(),
                )
            })
            .collect(),
        footer: Some(strings::help::FOOTER.to_string()),
    }
}

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "Help"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn icon(&self) -> Option<&str> {
        Some(":round_pushpin:")
    }

    fn accept(&self, command: &str) -> bool {
        command == "help"
    }

    async fn handle(
        &self,
        _args: &[String],
        context: &Context,
        bus: &EventBus,
        _command: &str,
    ) -> Result<()> {
        if !self.take_slot(&context.user_key(), context.timestamp).await {
            return Ok(());
        }
        let Some(registry) = self.registry.upgrade() else {
            tracing::warn!("Help requested after the registry was dropped");
            return Ok(());
        };
        reply(bus, context, listing(&registry)).await
    }
}
