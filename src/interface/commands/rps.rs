//! # Rock, Paper, Scissors
//!
//! `rps` picks one of the three classic values. `spc` is the same pick dressed up as
//! soulgem, parchment, clippers and stays out of the help listing.

use crate::application::bus::EventBus;
use crate::application::registry::{Command, CommandRegistry};
use crate::domain::config::AppConfig;
use crate::domain::context::Context;
use crate::interface::commands::reply;
use crate::strings;
use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;

pub fn register(registry: &Arc<CommandRegistry>, config: &AppConfig) {
    let prefix = &config.commands.prefix;
    registry.add_command(Arc::new(RpsCommand::new(Theme::Rps, prefix)));
    registry.add_command(Arc::new(RpsCommand::new(Theme::Spc, prefix)));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Rps,
    Spc,
}

impl Theme {
    fn title(self) -> &'static str {
        match self {
            Self::Rps => "Rock, paper, scissors",
            Self::Spc => "Soulgem, parchment, clippers",
        }
    }

    fn choices(self) -> [&'static str; 3] {
        match self {
            Self::Rps => ["**Rock** :rock:", "**Paper** :page_with_curl:", "**Scissors** :scissors:"],
            Self::Spc => ["**Soulgem** :gem:", "**Parchment** :scroll:", "**Clippers** :scissors:"],
        }
    }
}

/// `pick` indexes the theme's three choices.
pub fn render(theme: Theme, pick: usize) -> String {
    format!("{} ➔ {}", theme.title(), theme.choices()[pick % 3])
}

pub struct RpsCommand {
    theme: Theme,
    description: String,
}

impl RpsCommand {
    pub fn new(theme: Theme, prefix: &str) -> Self {
        Self {
            theme,
            description: strings::help::rps(prefix),
        }
    }
}

#[async_trait]
impl Command for RpsCommand {
    fn name(&self) -> &str {
        self.theme.title()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn icon(&self) -> Option<&str> {
        Some(":rock:")
    }

    fn hidden(&self) -> bool {
        self.theme == Theme::Spc
    }

    fn accept(&self, command: &str) -> bool {
        match self.theme {
            Theme::Rps => command == "rps",
            Theme::Spc => command == "spc",
        }
    }

    async fn handle(
        &self,
        args: &[String],
        context: &Context,
        bus: &EventBus,
        _command: &str,
    ) -> Result<()> {
        tracing::debug!(?args, "Rock, paper, scissors");
        let pick = rand::thread_rng().gen_range(0..3);
        reply(bus, context, render(self.theme, pick)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::commands::testing::Results;

    #[test]
    fn test_render() {
        assert_eq!(render(Theme::Rps, 0), "Rock, paper, scissors ➔ **Rock** :rock:");
        assert_eq!(
            render(Theme::Spc, 2),
            "Soulgem, parchment, clippers ➔ **Clippers** :scissors:"
        );
    }

    #[test]
    fn test_spc_is_hidden() {
        let rps = RpsCommand::new(Theme::Rps, "!");
        let spc = RpsCommand::new(Theme::Spc, "!");
        assert!(!rps.hidden());
        assert!(spc.hidden());
        assert!(rps.accept("rps") && !rps.accept("spc"));
        assert!(spc.accept("spc") && !spc.accept("rps"));
    }

    #[tokio::test]
    async fn test_pick_is_one_of_three() {
        let bus = EventBus::new();
        let results = Results::attach(&bus);
        let spc = RpsCommand::new(Theme::Spc, "!");
        for _ in 0..20 {
            spc.handle(&[], &Context::new("test", 0), &bus, "spc").await.unwrap();
        }
        let allowed: Vec<String> = (0..3).map(|i| render(Theme::Spc, i)).collect();
        let texts = results.texts();
        assert_eq!(texts.len(), 20);
        assert!(texts.iter().all(|t| allowed.contains(t)));
    }
}
