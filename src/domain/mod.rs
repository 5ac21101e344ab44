//! # Domain Layer
//!
//! Core definitions, types, and traits that define the business domain of the bot.
//! Independent of the chat platform, serving as the contract for the other layers.

pub mod config;
pub mod content;
pub mod context;
pub mod errors;
pub mod events;
pub mod traits;
pub mod types;
