//! # Default Command
//!
//! Catches any word nothing else accepted and ignores it.

use crate::application::bus::EventBus;
use crate::application::registry::Command;
use crate::domain::context::Context;
use anyhow::Result;
use async_trait::async_trait;

pub struct DefaultCommand;

#[async_trait]
impl Command for DefaultCommand {
    fn name(&self) -> &str {
        "Default"
    }

    fn description(&self) -> &str {
        "It is a mystery"
    }

    fn icon(&self) -> Option<&str> {
        Some(":question:")
    }

    fn hidden(&self) -> bool {
        true
    }

    fn accept(&self, _command: &str) -> bool {
        true
    }

    async fn handle(
        &self,
        args: &[String],
        context: &Context,
        _bus: &EventBus,
        command: &str,
    ) -> Result<()> {
        tracing::info!(cmd = command, ?args, source = %context.source, "Unhandled command");
        Ok(())
    }
}
