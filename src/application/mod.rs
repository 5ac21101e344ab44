//! # Application Layer
//!
//! Contains the dispatch core of the bot: the event bus, the command registry,
//! message parsing, process lifecycle and logging setup.

pub mod bus;
pub mod lifecycle;
pub mod logging;
pub mod parsing;
pub mod registry;
