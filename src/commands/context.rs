//! Per-interaction context
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation
//!
//! One [`SlashContext`] exists per inbound interaction. It carries the
//! request id used in log lines, the actor's normalized permission bits,
//! and the reply state machine enforcing Discord's interaction contract:
//! exactly one initial reply (immediate, or defer-then-edit), any number
//! of follow-ups after that.

use std::sync::Arc;

use anyhow::{bail, Result};
use serenity::http::Http;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::id::UserId;
use serenity::model::permissions::Permissions;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Content of one outgoing reply.
#[derive(Debug, Clone)]
pub struct Reply {
    content: String,
    ephemeral: bool,
}

impl Reply {
    /// A reply visible to everyone in the channel.
    pub fn new(content: impl Into<String>) -> Self {
        Reply {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// A reply visible only to the invoking user.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Reply {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// Client-side view of the interaction's reply lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplyState {
    /// Nothing sent yet
    Fresh,
    /// Acknowledged with a deferred response, no content yet
    Deferred,
    /// Initial reply delivered
    Replied,
}

/// How a `send` call reaches the user, given the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SendRoute {
    Initial,
    EditDeferred,
    FollowUp,
}

impl ReplyState {
    fn send_route(self) -> (SendRoute, ReplyState) {
        match self {
            ReplyState::Fresh => (SendRoute::Initial, ReplyState::Replied),
            ReplyState::Deferred => (SendRoute::EditDeferred, ReplyState::Replied),
            ReplyState::Replied => (SendRoute::FollowUp, ReplyState::Replied),
        }
    }

    fn may_acknowledge(self) -> bool {
        matches!(self, ReplyState::Fresh)
    }
}

/// Per-interaction handle passed to guards and handlers.
pub struct SlashContext {
    http: Arc<Http>,
    interaction: ApplicationCommandInteraction,
    request_id: Uuid,
    actor_permissions: Option<Permissions>,
    state: Mutex<ReplyState>,
}

impl SlashContext {
    pub fn new(
        http: Arc<Http>,
        interaction: ApplicationCommandInteraction,
        request_id: Uuid,
    ) -> Self {
        SlashContext {
            http,
            interaction,
            request_id,
            actor_permissions: None,
            state: Mutex::new(ReplyState::Fresh),
        }
    }

    /// Lifecycle hook awaited before dispatch touches the context.
    ///
    /// This is the single place raw actor permission data enters the
    /// system: the member's permission snapshot (when the interaction
    /// carries one) is normalized into a bitmask here, and everything
    /// downstream only sees [`SlashContext::actor_permissions`].
    pub async fn hydrate(&mut self) -> Result<()> {
        self.actor_permissions = self
            .interaction
            .member
            .as_ref()
            .and_then(|member| member.permissions);
        Ok(())
    }

    /// Correlation id for this interaction's log lines.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// The actor's normalized permission bits; `None` when the event
    /// carried no permission snapshot (e.g. invoked outside a guild).
    pub fn actor_permissions(&self) -> Option<Permissions> {
        self.actor_permissions
    }

    pub fn interaction(&self) -> &ApplicationCommandInteraction {
        &self.interaction
    }

    /// The invocation's argument payload.
    pub fn options(&self) -> &[CommandDataOption] {
        &self.interaction.data.options
    }

    pub fn user_id(&self) -> UserId {
        self.interaction.user.id
    }

    /// Deliver a reply: the initial response if none was made yet, an
    /// edit of the deferred response, or a follow-up message.
    pub async fn send(&self, reply: Reply) -> Result<()> {
        let mut state = self.state.lock().await;
        let (route, next) = state.send_route();
        match route {
            SendRoute::Initial => {
                self.interaction
                    .create_interaction_response(&self.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content(&reply.content);
                                if reply.ephemeral {
                                    message.ephemeral(true);
                                }
                                message
                            })
                    })
                    .await?;
            }
            SendRoute::EditDeferred => {
                self.interaction
                    .edit_original_interaction_response(&self.http, |message| {
                        message.content(&reply.content)
                    })
                    .await?;
            }
            SendRoute::FollowUp => {
                self.interaction
                    .create_followup_message(&self.http, |message| {
                        message.content(&reply.content);
                        if reply.ephemeral {
                            message.ephemeral(true);
                        }
                        message
                    })
                    .await?;
            }
        }
        *state = next;
        Ok(())
    }

    /// Acknowledge without content; the reply is delivered later via
    /// [`SlashContext::send`]. Already acknowledged is a no-op.
    pub async fn defer(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.may_acknowledge() {
            return Ok(());
        }
        self.acknowledge().await?;
        *state = ReplyState::Deferred;
        Ok(())
    }

    /// Acknowledge the interaction with no visible output at all.
    ///
    /// Only valid before any reply or defer; afterwards it is a usage
    /// error returned to the caller rather than silently ignored.
    pub async fn noop(&self) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            if !state.may_acknowledge() {
                bail!("cannot noop an interaction that has already been replied to or deferred");
            }
            self.acknowledge().await?;
            *state = ReplyState::Deferred;
        }
        self.delete_reply().await
    }

    /// Send a follow-up message regardless of reply state. Used for
    /// best-effort error reporting; fails if the interaction was never
    /// acknowledged.
    pub async fn follow_up(&self, reply: Reply) -> Result<()> {
        self.interaction
            .create_followup_message(&self.http, |message| {
                message.content(&reply.content);
                if reply.ephemeral {
                    message.ephemeral(true);
                }
                message
            })
            .await?;
        Ok(())
    }

    /// Delete the initial reply (or the deferred placeholder).
    pub async fn delete_reply(&self) -> Result<()> {
        self.interaction
            .delete_original_interaction_response(&self.http)
            .await?;
        Ok(())
    }

    async fn acknowledge(&self) -> Result<()> {
        self.interaction
            .create_interaction_response(&self.http, |response| {
                response.kind(InteractionResponseType::DeferredChannelMessageWithSource)
            })
            .await?;
        Ok(())
    }
}
