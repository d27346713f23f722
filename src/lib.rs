// Core layer - configuration and shared utilities
pub mod core;

// Features layer - feature modules backing the built-in commands
pub mod features;

// Application layer - command model, registry, sync, dispatch
pub mod command_handler;
pub mod commands;

// Re-export core config
pub use core::Config;

// Re-export the command framework surface
pub use command_handler::CommandHandler;
pub use commands::{
    commands_equal, CheckOutcome, CommandDefinition, CommandRegistry, CommandScope, CommandsApi,
    HttpCommandsApi, ParameterSpec, RemoteCommand, Reply, SlashCommand, SlashContext,
    Synchronizer, COMMAND_MERGE_LIMIT,
};

// Re-export feature items
pub use features::whitelist::{MojangClient, WhitelistEntry, WhitelistStore};
