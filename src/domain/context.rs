//! # Command Context
//!
//! Describes where a command came from and who triggered it. The dispatch core passes it
//! end-to-end without interpreting it; only commands (per-user memory) and the responder
//! (delivery target) look inside.

/// Origin tag for commands arriving from Matrix.
pub const SOURCE_MATRIX: &str = "matrix";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    /// Origin tag, e.g. `matrix`.
    pub source: String,
    /// Destination identifier (room id).
    pub channel: Option<String>,
    /// Message to thread a reply to.
    pub message: Option<String>,
    /// Thread root, when the command was posted inside a thread.
    pub thread: Option<String>,
    pub author: Option<String>,
    /// Set only when the command came from a group room.
    pub member: Option<String>,
    /// Event time in epoch milliseconds.
    pub timestamp: i64,
}

impl Context {
    pub fn new(source: impl Into<String>, timestamp: i64) -> Self {
        Self {
            source: source.into(),
            timestamp,
            ..Default::default()
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_thread(mut self, root: impl Into<String>) -> Self {
        self.thread = Some(root.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    /// Per-user memory key: `M:<member>` for group rooms, else `A:<author>`.
    ///
    /// The one-letter tag keeps member and author namespaces from colliding.
    pub fn user_key(&self) -> String {
        match (&self.member, &self.author) {
            (Some(member), _) => format!("M:{member}"),
            (None, Some(author)) => format!("A:{author}"),
            (None, None) => "A:".to_string(),
        }
    }
}
