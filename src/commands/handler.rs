//! Slash command trait
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation
//!
//! A command is its declarative [`CommandDefinition`] plus behavior: an
//! optional pre-run guard and the handler itself. No base type to
//! subclass; implement this trait and register the command.

use anyhow::Result;
use async_trait::async_trait;

use super::context::SlashContext;
use super::definition::CommandDefinition;

/// Verdict of a command's pre-run guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Proceed to the handler
    Allow,
    /// Refuse with the generic rejection message
    Deny,
    /// Refuse with a caller-supplied message
    DenyWith(String),
}

impl CheckOutcome {
    /// The ephemeral rejection text to send, or `None` when allowed.
    pub fn rejection_message(&self) -> Option<&str> {
        match self {
            CheckOutcome::Allow => None,
            CheckOutcome::Deny => Some("This command could not be run."),
            CheckOutcome::DenyWith(message) => Some(message),
        }
    }
}

/// Trait implemented by every slash command.
///
/// # Example
///
/// ```ignore
/// pub struct PingCommand;
///
/// #[async_trait]
/// impl SlashCommand for PingCommand {
///     fn definition(&self) -> CommandDefinition {
///         CommandDefinition::new("ping", "pong")
///     }
///
///     async fn run(&self, ctx: &SlashContext) -> Result<()> {
///         ctx.send(Reply::new("Pong!")).await
///     }
/// }
/// ```
#[async_trait]
pub trait SlashCommand: Send + Sync {
    /// The declarative definition registered and synced for this command.
    fn definition(&self) -> CommandDefinition;

    /// Guard run after the permission check and before the handler.
    /// Default: always allow.
    async fn check(&self, _ctx: &SlashContext) -> CheckOutcome {
        CheckOutcome::Allow
    }

    /// Handle the invocation.
    async fn run(&self, ctx: &SlashContext) -> Result<()>;
}
