//! Environment-backed bot configuration

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serenity::model::id::GuildId;

/// Runtime configuration, read once at startup from the environment
/// (a `.env` file is honored when present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token
    pub discord_token: String,
    /// Development guild override: when set, every command is retargeted
    /// to this guild before syncing (guild commands update instantly)
    pub guild_id: Option<GuildId>,
    /// Report handler errors back to the invoking user instead of
    /// propagating them to the event loop
    pub report_errors: bool,
    /// Reconcile registered commands against Discord on gateway ready
    pub sync_on_ready: bool,
    /// Default log filter for env_logger
    pub log_level: String,
    /// Location of the Minecraft whitelist file
    pub whitelist_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let discord_token =
            env::var("DISCORD_TOKEN").context("DISCORD_TOKEN must be set")?;

        let guild_id = match env::var("GUILD_ID") {
            Ok(raw) => Some(GuildId(
                raw.parse().context("GUILD_ID must be a numeric guild id")?,
            )),
            Err(_) => None,
        };

        Ok(Config {
            discord_token,
            guild_id,
            report_errors: env_flag("REPORT_ERRORS", true),
            sync_on_ready: env_flag("SYNC_ON_READY", true),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            whitelist_path: env::var("WHITELIST_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/mc-whitelist.json")),
        })
    }
}

/// Boolean environment flag; unset falls back to `default`.
fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => parse_flag(&value),
        Err(_) => default,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
