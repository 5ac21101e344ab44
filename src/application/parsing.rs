//! # Message Parsing
//!
//! Turns raw chat text into a command word plus arguments, and decides which channels the bot
//! will take commands from. Both are pure; the message listener chains them.

use crate::domain::config::ChannelsConfig;
use crate::domain::types::{ChannelInfo, ChannelKind};
use anyhow::{Context, Result};
use regex::Regex;

/// Split `text` into `(command, args)` if it invokes a command under `prefix`.
///
/// The command word is lower-cased; argument case is preserved. A prefix followed by whitespace
/// (`"! foo"`) is not a command.
pub fn parse_command(text: &str, prefix: &str) -> Option<(String, Vec<String>)> {
    let rest = text.strip_prefix(prefix)?;
    if !rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
        return None;
    }
    let mut tokens = rest.split_whitespace();
    let command = tokens.next()?.to_lowercase();
    let args = tokens.map(str::to_string).collect();
    Some((command, args))
}

/// Channel admission rules.
#[derive(Debug, Clone)]
pub struct ChannelPolicy {
    allow_threads: bool,
    allow_dms: bool,
    pattern: Regex,
}

impl ChannelPolicy {
    pub fn from_config(config: &ChannelsConfig) -> Result<Self> {
        let pattern = Regex::new(&config.pattern)
            .with_context(|| format!("Invalid channel pattern `{}`", config.pattern))?;
        Ok(Self {
            allow_threads: config.allow_threads,
            allow_dms: config.allow_dms,
            pattern,
        })
    }

    /// Threads and DMs are gated by their flags; plain group rooms must match the name pattern.
    pub fn admits(&self, channel: &ChannelInfo) -> bool {
        if channel.kind == ChannelKind::NonText {
            return false;
        }
        if channel.is_thread() && !self.allow_threads {
            return false;
        }
        if channel.kind == ChannelKind::Direct && !self.allow_dms {
            return false;
        }
        if channel.kind == ChannelKind::Group && !channel.is_thread() {
            return channel
                .name
                .as_deref()
                .is_some_and(|name| self.pattern.is_match(name));
        }
        true
    }
}
