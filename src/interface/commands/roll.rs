//! # Roll Commands
//!
//! `roll` evaluates a dice expression with an optional `# comment` suffix and remembers the
//! arguments per user. Reroll is triggered by the prefix typed twice (`!!` when the prefix is
//! `!`) and repeats the remembered roll, optionally with a new comment.

use crate::application::bus::EventBus;
use crate::application::registry::{Command, CommandRegistry};
use crate::domain::config::AppConfig;
use crate::domain::context::Context;
use crate::domain::traits::DiceRoller;
use crate::infrastructure::dice::StandardDice;
use crate::interface::commands::reply;
use crate::strings::{self, messages};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub fn register(registry: &Arc<CommandRegistry>, config: &AppConfig) {
    let roller: Arc<dyn DiceRoller> = Arc::new(StandardDice::default());
    let memory = RollMemory::default();
    let prefix = config.commands.prefix.clone();
    registry.add_command(Arc::new(RollCommand::new(
        roller.clone(),
        memory.clone(),
        &prefix,
    )));
    registry.add_command(Arc::new(RerollCommand::new(roller, memory, &prefix)));
}

/// Last roll arguments per user key, shared by roll and reroll.
#[derive(Clone, Default)]
pub struct RollMemory {
    last: Arc<Mutex<HashMap<String, Vec<String>>>>,
}

impl RollMemory {
    pub async fn get(&self, key: &str) -> Option<Vec<String>> {
        self.last.lock().await.get(key).cloned()
    }

    pub async fn set(&self, key: String, args: Vec<String>) {
        self.last.lock().await.insert(key, args);
    }
}

/// Rejoin `args` and split on the first `#` into `(expr, comment)`, both trimmed.
pub fn split_expression(args: &[String]) -> (String, String) {
    let joined = args.join(" ");
    match joined.split_once('#') {
        Some((expr, comment)) => (expr.trim().to_string(), comment.trim().to_string()),
        None => (joined.trim().to_string(), String::new()),
    }
}

/// Args that re-derive to the same `(expr, comment)`.
fn remembered_args(expr: &str, comment: &str) -> Vec<String> {
    let mut args: Vec<String> = expr.split_whitespace().map(str::to_string).collect();
    args.push("#".to_string());
    args.extend(comment.split_whitespace().map(str::to_string));
    args
}

/// Roll and render. `Err` carries the user message of a failed roll.
fn evaluate(
    roller: &dyn DiceRoller,
    expr: &str,
    comment: &str,
    context: &Context,
) -> Result<String, String> {
    match roller.roll(expr) {
        Ok(result) => Ok(messages::with_comment(&result, comment)),
        Err(err) => {
            let member = context.user_key();
            if err.is_quiet() {
                tracing::info!(expr, member = %member, code = err.error_code(), "{err}");
            } else {
                tracing::error!(expr, member = %member, code = err.error_code(), error = ?err, "{err}");
            }
            Err(err.user_message().to_string())
        }
    }
}

pub struct RollCommand {
    roller: Arc<dyn DiceRoller>,
    memory: RollMemory,
    description: String,
}

impl RollCommand {
    pub fn new(roller: Arc<dyn DiceRoller>, memory: RollMemory, prefix: &str) -> Self {
        Self {
            roller,
            memory,
            description: strings::help::roll(prefix),
        }
    }
}

#[async_trait]
impl Command for RollCommand {
    fn name(&self) -> &str {
        "Roll"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn icon(&self) -> Option<&str> {
        Some(":game_die:")
    }

    fn accept(&self, command: &str) -> bool {
        command == "roll"
    }

    async fn handle(
        &self,
        args: &[String],
        context: &Context,
        bus: &EventBus,
        _command: &str,
    ) -> Result<()> {
        tracing::debug!(?args, "Roll");
        let (expr, comment) = split_expression(args);
        match evaluate(self.roller.as_ref(), &expr, &comment, context) {
            Ok(content) => {
                reply(bus, context, content).await?;
                self.memory.set(context.user_key(), args.to_vec()).await;
                Ok(())
            }
            Err(user_message) => reply(bus, context, user_message).await,
        }
    }
}

pub struct RerollCommand {
    roller: Arc<dyn DiceRoller>,
    memory: RollMemory,
    prefix: String,
    description: String,
}

impl RerollCommand {
    pub fn new(roller: Arc<dyn DiceRoller>, memory: RollMemory, prefix: &str) -> Self {
        Self {
            roller,
            memory,
            prefix: prefix.to_string(),
            description: strings::help::reroll(prefix),
        }
    }
}

#[async_trait]
impl Command for RerollCommand {
    fn name(&self) -> &str {
        "Reroll"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn icon(&self) -> Option<&str> {
        Some(":arrows_counterclockwise:")
    }

    /// The parser strips one prefix, so `!!` arrives as the word `!`.
    fn accept(&self, command: &str) -> bool {
        command == self.prefix
    }

    async fn handle(
        &self,
        args: &[String],
        context: &Context,
        bus: &EventBus,
        _command: &str,
    ) -> Result<()> {
        tracing::debug!(?args, "Reroll");
        let key = context.user_key();
        let Some(last) = self.memory.get(&key).await else {
            return reply(bus, context, messages::REROLL_EMPTY).await;
        };

        let (expr, stored_comment) = split_expression(&last);
        let (_, new_comment) = split_expression(args);
        let comment = if new_comment.is_empty() {
            stored_comment
        } else {
            self.memory
                .set(key, remembered_args(&expr, &new_comment))
                .await;
            new_comment
        };

        let content = match evaluate(self.roller.as_ref(), &expr, &comment, context) {
            Ok(content) | Err(content) => content,
        };
        reply(bus, context, content).await
    }
}
