//! # Command Handlers
//!
//! Each submodule is a command provider: a function that adds its commands to the registry.
//! Providers run in a fixed order at boot; that order is the dispatch priority.

pub mod calendar;
pub mod fallback;
pub mod help;
pub mod roll;
pub mod rps;
pub mod timestamp;

use crate::application::bus::EventBus;
use crate::application::registry::{CommandProvider, CommandRegistry};
use crate::domain::config::AppConfig;
use crate::domain::content::Content;
use crate::domain::context::Context;
use crate::domain::events::{self, Payload};
use crate::domain::types::CommandResult;
use anyhow::Result;
use std::sync::Arc;

const PROVIDERS: &[CommandProvider] = &[
    help::register,
    calendar::register,
    roll::register,
    rps::register,
    timestamp::register,
];

/// Build the registry with every provider installed. The catch-all sits outside the list.
pub fn install(config: &AppConfig) -> Arc<CommandRegistry> {
    let registry = Arc::new(CommandRegistry::new(
        config.commands.toggle.clone(),
        Arc::new(fallback::DefaultCommand),
    ));
    for provider in PROVIDERS {
        provider(&registry, config);
    }
    registry
}

/// Publish a `command-result` and wait for delivery listeners to finish.
pub async fn reply(bus: &EventBus, context: &Context, content: impl Into<Content>) -> Result<()> {
    bus.notify(
        events::COMMAND_RESULT,
        Payload::CommandResult(CommandResult {
            context: context.clone(),
            content: content.into(),
        }),
    )
    .await
}

/// Listens for `command-result` events and keeps them for assertions.
#[cfg(test)]
pub(crate) mod testing {
    use crate::application::bus::{EventBus, Listener};
    use crate::domain::content::Content;
    use crate::domain::events::{self, Payload};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    pub(crate) struct Results {
        seen: Mutex<Vec<Content>>,
    }

    impl Results {
        pub(crate) fn attach(bus: &EventBus) -> Arc<Self> {
            let results = Arc::new(Self::default());
            bus.add_listener(results.clone());
            results
        }

        pub(crate) fn contents(&self) -> Vec<Content> {
            self.seen.lock().unwrap().clone()
        }

        pub(crate) fn texts(&self) -> Vec<String> {
            self.contents()
                .into_iter()
                .map(|content| match content {
                    Content::Text(text) => text,
                    other => other.to_markdown(),
                })
                .collect()
        }

        pub(crate) fn clear(&self) {
            self.seen.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl Listener for Results {
        fn accept(&self, event_type: &str) -> bool {
            event_type == events::COMMAND_RESULT
        }

        async fn notify(&self, payload: &Payload, _bus: &EventBus) -> Result<()> {
            if let Payload::CommandResult(result) = payload {
                self.seen.lock().unwrap().push(result.content.clone());
            }
            Ok(())
        }
    }

    pub(crate) fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toggles: &str) -> AppConfig {
        AppConfig::from_yaml(&format!(
            "services:\n  matrix:\n    username: u\n    password: p\n    homeserver: h\ncommands:\n  toggle:\n{toggles}"
        ))
        .unwrap()
    }

    #[test]
    fn test_install_respects_toggles_and_order() {
        let registry = install(&config(
            "    Help: true\n    Roll: true\n    Reroll: true\n    Timestamp: true\n    Soulgem, parchment, clippers: true\n",
        ));
        let names: Vec<String> = registry
            .get_commands(true)
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Help", "Roll", "Reroll", "Soulgem, parchment, clippers", "Timestamp"]
        );
        let visible = registry.get_commands(false);
        assert_eq!(visible.len(), 4);
    }

    #[test]
    fn test_fallback_always_present() {
        let registry = install(&config("    Nothing: true\n"));
        assert!(registry.get_commands(true).is_empty());
        assert_eq!(registry.resolve("help").name(), "Default");
    }
}
