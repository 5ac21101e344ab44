//! # Roll Errors
//!
//! The closed set of failures a dice evaluation can produce. Each variant knows how loudly it
//! should be logged and which pre-rendered message the user sees.

use crate::strings::messages;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RollError {
    /// Typo-level mistake in the expression.
    #[error("invalid chunk in dice expression: {0}")]
    InvalidInput(String),

    #[error("excessive expression: {0}")]
    ResourceExhausted(String),

    #[error("roll limit exceeded: {0}")]
    Timeout(String),

    #[error("unhandled error during roll: {0}")]
    Internal(String),
}

impl RollError {
    /// Quiet errors are user mistakes: logged at info rather than error.
    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => messages::ROLL_INVALID,
            Self::ResourceExhausted(_) => messages::ROLL_EXCESSIVE,
            Self::Timeout(_) => messages::ROLL_TIMEOUT,
            Self::Internal(_) => messages::ROLL_INTERNAL,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ResourceExhausted(_) => "resource_exhausted",
            Self::Timeout(_) => "timeout",
            Self::Internal(_) => "internal",
        }
    }
}
