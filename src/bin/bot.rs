use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::prelude::*;

use slashes::commands::slash::{McWhitelistCommand, PingCommand, ProbeCommand};
use slashes::commands::{CommandDefinition, CommandRegistry, HttpCommandsApi, Synchronizer};
use slashes::features::whitelist::{MojangClient, WhitelistStore};
use slashes::{CommandHandler, Config};

struct Handler {
    command_handler: Arc<CommandHandler>,
    definitions: Vec<CommandDefinition>,
    sync_on_ready: bool,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        if self.sync_on_ready {
            let synchronizer = Synchronizer::new(HttpCommandsApi::new(ctx.http.clone()));
            match synchronizer.sync_all(&self.definitions).await {
                Ok(()) => info!("✅ Synced {} slash commands", self.definitions.len()),
                Err(e) => error!("❌ Failed to sync slash commands: {e:?}"),
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            if let Err(e) = self
                .command_handler
                .handle_slash_command(&ctx, &command)
                .await
            {
                error!("Error handling slash command '{}': {e:?}", command.data.name);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting slashes bot...");

    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(PingCommand));
    registry.register(Arc::new(ProbeCommand));
    registry.register(Arc::new(McWhitelistCommand::new(
        WhitelistStore::new(config.whitelist_path.clone()),
        MojangClient::new(),
    )));
    info!("Loaded {} commands", registry.len());

    let mut definitions: Vec<CommandDefinition> = registry.definitions().cloned().collect();
    if let Some(guild_id) = config.guild_id {
        // Guild commands update instantly; global commands can take up
        // to an hour to propagate.
        info!(
            "🔧 Development mode: retargeting {} commands to guild {guild_id}",
            definitions.len()
        );
        definitions = definitions
            .into_iter()
            .map(|definition| definition.guild(guild_id))
            .collect();
    }

    let command_handler = Arc::new(CommandHandler::new(
        Arc::new(registry),
        config.report_errors,
    ));

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;
    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(Handler {
            command_handler,
            definitions,
            sync_on_ready: config.sync_on_ready,
        })
        .await?;

    client.start().await?;
    Ok(())
}
