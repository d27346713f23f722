//! Remote command registry access
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation
//!
//! [`CommandsApi`] is the seam between the synchronizer and Discord's
//! application-command endpoints. [`HttpCommandsApi`] is the production
//! implementation; tests substitute an in-memory one.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serenity::builder::CreateApplicationCommand;
use serenity::http::Http;
use serenity::model::application::command::Command;
use serenity::model::id::CommandId;

use super::definition::{CommandDefinition, CommandScope};

/// A command as registered on Discord: the definition it reflects plus
/// the remote-assigned id. The id is only ever used to delete the record;
/// records themselves are never edited in place.
#[derive(Debug, Clone)]
pub struct RemoteCommand {
    pub id: CommandId,
    pub definition: CommandDefinition,
}

impl RemoteCommand {
    pub fn from_model(command: Command, scope: CommandScope) -> Self {
        RemoteCommand {
            id: command.id,
            definition: CommandDefinition::from_model(command, scope),
        }
    }
}

/// Remote registry operations, per scope namespace.
#[async_trait]
pub trait CommandsApi: Send + Sync {
    /// Fetch the full remote snapshot for a scope.
    async fn fetch_all(&self, scope: &CommandScope) -> Result<Vec<RemoteCommand>>;

    /// Register one new command.
    async fn create(&self, scope: &CommandScope, definition: &CommandDefinition)
        -> Result<RemoteCommand>;

    /// Remove one command by its remote id.
    async fn delete(&self, scope: &CommandScope, id: CommandId) -> Result<()>;

    /// Replace the scope's whole command set in one call. Anything not in
    /// `definitions` is removed by the service.
    async fn bulk_set(
        &self,
        scope: &CommandScope,
        definitions: &[CommandDefinition],
    ) -> Result<Vec<RemoteCommand>>;
}

/// [`CommandsApi`] over serenity's HTTP client.
pub struct HttpCommandsApi {
    http: Arc<Http>,
}

impl HttpCommandsApi {
    pub fn new(http: Arc<Http>) -> Self {
        HttpCommandsApi { http }
    }
}

#[async_trait]
impl CommandsApi for HttpCommandsApi {
    async fn fetch_all(&self, scope: &CommandScope) -> Result<Vec<RemoteCommand>> {
        let models = match scope {
            CommandScope::Global => {
                Command::get_global_application_commands(&self.http).await?
            }
            CommandScope::Guild(guild_id) => {
                guild_id.get_application_commands(&self.http).await?
            }
        };
        Ok(models
            .into_iter()
            .map(|model| RemoteCommand::from_model(model, *scope))
            .collect())
    }

    async fn create(
        &self,
        scope: &CommandScope,
        definition: &CommandDefinition,
    ) -> Result<RemoteCommand> {
        let model = match scope {
            CommandScope::Global => {
                Command::create_global_application_command(&self.http, |command| {
                    *command = definition.to_builder();
                    command
                })
                .await?
            }
            CommandScope::Guild(guild_id) => {
                guild_id
                    .create_application_command(&self.http, |command| {
                        *command = definition.to_builder();
                        command
                    })
                    .await?
            }
        };
        Ok(RemoteCommand::from_model(model, *scope))
    }

    async fn delete(&self, scope: &CommandScope, id: CommandId) -> Result<()> {
        match scope {
            CommandScope::Global => {
                Command::delete_global_application_command(&self.http, id).await?;
            }
            CommandScope::Guild(guild_id) => {
                guild_id.delete_application_command(&self.http, id).await?;
            }
        }
        Ok(())
    }

    async fn bulk_set(
        &self,
        scope: &CommandScope,
        definitions: &[CommandDefinition],
    ) -> Result<Vec<RemoteCommand>> {
        let builders: Vec<CreateApplicationCommand> =
            definitions.iter().map(CommandDefinition::to_builder).collect();
        let models = match scope {
            CommandScope::Global => {
                Command::set_global_application_commands(&self.http, |commands| {
                    commands.set_application_commands(builders)
                })
                .await?
            }
            CommandScope::Guild(guild_id) => {
                guild_id
                    .set_application_commands(&self.http, |commands| {
                        commands.set_application_commands(builders)
                    })
                    .await?
            }
        };
        Ok(models
            .into_iter()
            .map(|model| RemoteCommand::from_model(model, *scope))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The trait must stay object-safe; the synchronizer holds it behind
    // a generic but callers may box it.
    fn _assert_object_safe(_: &dyn CommandsApi) {}
}
