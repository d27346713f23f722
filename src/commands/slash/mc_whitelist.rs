//! # Whitelist Command
//!
//! Adds the invoking user's Minecraft account to the server whitelist.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use log::info;
use regex::Regex;
use serenity::model::application::command::CommandOptionType;

use crate::commands::context::{Reply, SlashContext};
use crate::commands::definition::{CommandDefinition, ParameterSpec};
use crate::commands::handler::SlashCommand;
use crate::commands::slash::get_string_option;
use crate::features::whitelist::{find_conflict, MojangClient, WhitelistEntry, WhitelistStore};

pub struct McWhitelistCommand {
    store: WhitelistStore,
    mojang: MojangClient,
}

impl McWhitelistCommand {
    pub fn new(store: WhitelistStore, mojang: MojangClient) -> Self {
        McWhitelistCommand { store, mojang }
    }
}

#[async_trait]
impl SlashCommand for McWhitelistCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition::new("mc-whitelist", "Get whitelisted on the Minecraft server").option(
            ParameterSpec::new(
                CommandOptionType::String,
                "username",
                "Your Minecraft *Java Edition* username",
            )
            .required(),
        )
    }

    async fn run(&self, ctx: &SlashContext) -> Result<()> {
        let username = get_string_option(ctx.options(), "username")
            .ok_or_else(|| anyhow!("missing required 'username' option"))?;

        if !is_valid_username(&username) {
            ctx.send(Reply::ephemeral(
                "Username must be between 1 and 16 characters long and only contain \
                 letters, numbers, and underscores.",
            ))
            .await?;
            return Ok(());
        }

        let profile = match self.mojang.fetch_profile(&username).await? {
            Some(profile) => profile,
            None => {
                ctx.send(Reply::ephemeral("Username not found.")).await?;
                return Ok(());
            }
        };

        let entries = self.store.load().await?;
        let user_id = ctx.user_id().0;
        if find_conflict(&entries, user_id, &profile.name, &profile.id).is_some() {
            ctx.send(Reply::ephemeral("Already whitelisted.")).await?;
            return Ok(());
        }

        self.store
            .add(WhitelistEntry {
                user_id,
                username: profile.name.clone(),
                uuid: profile.id,
                added_at: Utc::now(),
            })
            .await?;
        info!("Whitelisted '{}' for user {user_id}", profile.name);

        ctx.send(Reply::new(format!(
            "Whitelisted `{}` on the server!",
            profile.name
        )))
        .await
    }
}

fn is_valid_username(username: &str) -> bool {
    Regex::new(r"^[a-zA-Z0-9_]{1,16}$")
        .map(|pattern| pattern.is_match(username))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_has_required_username() {
        let command = McWhitelistCommand::new(
            WhitelistStore::new("unused.json".into()),
            MojangClient::new(),
        );
        let definition = command.definition();
        assert_eq!(definition.name, "mc-whitelist");
        assert_eq!(definition.options.len(), 1);
        assert_eq!(definition.options[0].name, "username");
        assert!(definition.options[0].required);
    }

    #[test]
    fn test_valid_usernames() {
        for name in ["Steve", "a", "Herobrine_", "x_x_x_x_x_x_x_x1"] {
            assert!(is_valid_username(name), "expected valid: {name}");
        }
    }

    #[test]
    fn test_invalid_usernames() {
        for name in ["", "this_name_is_far_too_long", "bad name", "no-dashes", "héro"] {
            assert!(!is_valid_username(name), "expected invalid: {name}");
        }
    }
}
