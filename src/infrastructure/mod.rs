//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (ChatProvider, DiceRoller).

pub mod dice;
pub mod matrix;
