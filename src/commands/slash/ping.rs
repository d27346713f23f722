//! # Ping Command
//!
//! Round-trip latency probe.

use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;

use crate::commands::context::{Reply, SlashContext};
use crate::commands::definition::CommandDefinition;
use crate::commands::handler::SlashCommand;

pub struct PingCommand;

#[async_trait]
impl SlashCommand for PingCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition::new("ping", "pong")
    }

    async fn run(&self, ctx: &SlashContext) -> Result<()> {
        // Time the acknowledgement round trip, then fill in the reply.
        let start = Instant::now();
        ctx.defer().await?;
        let elapsed = start.elapsed();

        ctx.send(Reply::new(format!(
            "Pong! {:.2}ms",
            elapsed.as_secs_f64() * 1000.0
        )))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition() {
        let definition = PingCommand.definition();
        assert_eq!(definition.name, "ping");
        assert!(definition.options.is_empty());
    }
}
