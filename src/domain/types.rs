//! # Domain Types
//!
//! Common data structures that travel on the bus between transport, registry and commands.

use crate::domain::content::Content;
use crate::domain::context::Context;

/// A parsed command trigger: `{command, args, context}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Lower-cased command word, prefix stripped.
    pub command: String,
    pub args: Vec<String>,
    pub context: Context,
}

/// Output of a command, addressed by its context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub context: Context,
    pub content: Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Named multi-user room.
    Group,
    /// Direct conversation.
    Direct,
    /// Anything the bot cannot hold a text conversation in.
    NonText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: String,
    pub name: Option<String>,
    pub kind: ChannelKind,
    /// Root event of the thread the message was posted in.
    pub thread: Option<String>,
}

impl ChannelInfo {
    pub fn is_thread(&self) -> bool {
        self.thread.is_some()
    }
}

/// Platform-neutral view of a received text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub id: String,
    pub text: String,
    pub sender: String,
    pub sender_is_bot: bool,
    pub channel: ChannelInfo,
    /// Epoch milliseconds.
    pub timestamp: i64,
}
