//! # Probe Command
//!
//! Acknowledges the interaction with no visible output. Mostly useful
//! when poking at a deployment to confirm dispatch works end to end.

use anyhow::Result;
use async_trait::async_trait;

use crate::commands::context::SlashContext;
use crate::commands::definition::CommandDefinition;
use crate::commands::handler::SlashCommand;

pub struct ProbeCommand;

#[async_trait]
impl SlashCommand for ProbeCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition::new("probe", "Silently acknowledge an interaction")
    }

    async fn run(&self, ctx: &SlashContext) -> Result<()> {
        ctx.noop().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition() {
        let definition = ProbeCommand.definition();
        assert_eq!(definition.name, "probe");
    }
}
