//! # Built-in Slash Commands
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial set (ping, probe, mc-whitelist)

mod mc_whitelist;
mod ping;
mod probe;

pub use mc_whitelist::McWhitelistCommand;
pub use ping::PingCommand;
pub use probe::ProbeCommand;

use serenity::model::application::interaction::application_command::CommandDataOption;

/// Utility function to get a string option from a slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}
