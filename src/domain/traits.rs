//! # Domain Traits
//!
//! Abstract interfaces for the external collaborators (chat transport, dice evaluator).
//! Allows for pluggable implementations in the Infrastructure layer.

use crate::domain::errors::RollError;
use async_trait::async_trait;

/// Abstract interface for a Chat Provider (e.g., Matrix)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a markdown message to a channel, optionally as a reply and inside the thread rooted
    /// at `thread`. Returns the new message id.
    async fn send_message(
        &self,
        channel: &str,
        content: &str,
        reply_to: Option<&str>,
        thread: Option<&str>,
    ) -> Result<String, String>;

    /// Join a channel the bot was invited to.
    async fn join_channel(&self, channel: &str) -> Result<(), String>;
}

/// Evaluates a dice expression into a user-facing result line.
pub trait DiceRoller: Send + Sync {
    /// An empty expression rolls the canonical single die.
    fn roll(&self, expr: &str) -> Result<String, RollError>;
}
