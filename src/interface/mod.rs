//! # Interface Layer
//!
//! Entry points into the application: chat commands and the bus listeners that connect the
//! transport to them.

pub mod commands;
pub mod listeners;
