//! Interaction dispatch
//!
//! Routes application-command interactions to their registered command:
//! resolve by name, check permissions, run the guard, run the handler,
//! and map failures to a user-visible reply when error reporting is on.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::permissions::Permissions;
use serenity::prelude::Context;
use uuid::Uuid;

use crate::commands::context::{Reply, SlashContext};
use crate::commands::registry::CommandRegistry;
use crate::core::truncate_for_message;

#[derive(Clone)]
pub struct CommandHandler {
    registry: Arc<CommandRegistry>,
    report_errors: bool,
}

impl CommandHandler {
    /// With `report_errors` set, handler failures are logged and echoed
    /// back to the invoking user as an ephemeral follow-up; otherwise
    /// they propagate to the caller's event loop.
    pub fn new(registry: Arc<CommandRegistry>, report_errors: bool) -> Self {
        CommandHandler {
            registry,
            report_errors,
        }
    }

    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let mut slash_ctx = SlashContext::new(ctx.http.clone(), command.clone(), request_id);
        slash_ctx.hydrate().await?;

        // The remote registry validated the name before delivering the
        // event, so a miss here is configuration drift. No reply.
        let entry = match self.registry.get(&command.data.name) {
            Some(entry) => entry,
            None => {
                warn!(
                    "[{request_id}] Unhandled slash command '{}'",
                    command.data.name
                );
                return Ok(());
            }
        };

        if !authorized(
            slash_ctx.actor_permissions(),
            entry.definition.required_permissions,
        ) {
            debug!(
                "[{request_id}] Denied '{}': missing required permissions",
                command.data.name
            );
            slash_ctx
                .send(Reply::ephemeral(
                    "You do not have permission to use this command.",
                ))
                .await?;
            return Ok(());
        }

        let outcome = entry.command.check(&slash_ctx).await;
        if let Some(message) = outcome.rejection_message() {
            slash_ctx.send(Reply::ephemeral(message)).await?;
            return Ok(());
        }

        if let Err(err) = entry.command.run(&slash_ctx).await {
            if !self.report_errors {
                return Err(err);
            }
            error!(
                "[{request_id}] Command '{}' failed: {err:?}",
                command.data.name
            );
            let report = truncate_for_message(&format!(
                "An error occurred while running this command:```\n{err}\n```"
            ));
            if let Err(report_err) = slash_ctx.follow_up(Reply::ephemeral(report)).await {
                error!("[{request_id}] Failed to report command error: {report_err}");
            }
        }

        debug!(
            "[{request_id}] Ran command '{}' with options {:?}",
            command.data.name,
            command.data.options
        );
        Ok(())
    }
}

/// A missing permission snapshot (e.g. a DM invocation) skips the check;
/// otherwise the actor's bits must cover everything the definition
/// requires.
fn authorized(actual: Option<Permissions>, required: Permissions) -> bool {
    match actual {
        Some(actual) => actual.contains(required),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_snapshot_skips_check() {
        assert!(authorized(None, Permissions::ADMINISTRATOR));
    }

    #[test]
    fn test_empty_requirement_always_passes() {
        assert!(authorized(Some(Permissions::empty()), Permissions::empty()));
        assert!(authorized(
            Some(Permissions::SEND_MESSAGES),
            Permissions::empty()
        ));
    }

    #[test]
    fn test_superset_required() {
        let actual = Permissions::SEND_MESSAGES | Permissions::MANAGE_MESSAGES;
        assert!(authorized(Some(actual), Permissions::MANAGE_MESSAGES));
        assert!(!authorized(
            Some(Permissions::SEND_MESSAGES),
            Permissions::MANAGE_MESSAGES
        ));
        assert!(!authorized(
            Some(Permissions::SEND_MESSAGES),
            Permissions::SEND_MESSAGES | Permissions::ADMINISTRATOR
        ));
    }
}
