//! # Command System
//!
//! Slash command (/) definitions, registry, reconciliation and dispatch.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

pub mod api;
pub mod compare;
pub mod context;
pub mod definition;
pub mod handler;
pub mod registry;
pub mod slash;
pub mod sync;

// Re-export the CommandHandler from the crate root module
pub use crate::command_handler::CommandHandler;

// Re-export the framework surface
pub use api::{CommandsApi, HttpCommandsApi, RemoteCommand};
pub use compare::commands_equal;
pub use context::{Reply, SlashContext};
pub use definition::{CommandDefinition, CommandScope, ParameterChoice, ParameterSpec};
pub use handler::{CheckOutcome, SlashCommand};
pub use registry::{CommandRegistry, RegisteredCommand};
pub use sync::{Synchronizer, COMMAND_MERGE_LIMIT};

// Re-export commonly used items from submodules
pub use slash::get_string_option;
