//! # Event Tags and Payloads
//!
//! Event types are opaque string tags; the bus only ever compares them. Payloads are a closed
//! enum so each listener can match the shape it expects.

use crate::domain::types::{CommandRequest, CommandResult, IncomingMessage};

pub const STARTUP: &str = "startup";
/// Every component that needs cleanup listens for this one.
pub const SHUTDOWN: &str = "shutdown";

pub const ERROR: &str = "error";
pub const INFO: &str = "info";

pub const COMMAND: &str = "command";
pub const COMMAND_RESULT: &str = "command-result";

/// Transport events raised by the Matrix adapter.
pub mod matrix {
    pub const LOGIN_OK: &str = "matrix-login-ok";
    pub const LOGIN_ERR: &str = "matrix-login-err";
    pub const SYNC_ERR: &str = "matrix-sync-err";
    pub const MESSAGE: &str = "matrix-message";
    pub const INVITE: &str = "matrix-invite";
}

#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Command(CommandRequest),
    CommandResult(CommandResult),
    /// Human-readable notice for `info` / `error`.
    Log { msg: String },
    Message(IncomingMessage),
    Failure { error: String },
    Room { id: String, name: Option<String> },
}
