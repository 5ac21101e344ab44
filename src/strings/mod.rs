//! # Strings Module
//!
//! Centralizes user-facing strings, help text and lore tables.
//! Ensures consistency in messaging and easier updates.

pub mod calendar;
pub mod help;
pub mod messages;
