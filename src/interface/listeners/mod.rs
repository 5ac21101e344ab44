//! # Transport Listeners
//!
//! Bus listeners that sit between the Matrix adapter and the command registry: inbound
//! message filtering, outbound delivery, notice mirroring and client lifecycle glue.

pub mod channel_log;
pub mod lifecycle;
pub mod message;
pub mod responder;

pub use channel_log::ChannelLogger;
pub use lifecycle::{InviteListener, LoginErrListener, LoginOkListener, StopSyncListener, SyncErrorListener};
pub use message::MessageListener;
pub use responder::CommandResponder;
