//! Declarative command definitions
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation
//!
//! A [`CommandDefinition`] describes one slash command: name, description,
//! parameter schema, scope and required permissions. Definitions are plain
//! data; behavior lives in the handler registered alongside them. The
//! builders here produce the serenity wire representation, and the
//! `from_model` conversions read remote state back into the same shape so
//! the comparator can diff local against remote.

use std::fmt;

use serde_json::Value;
use serenity::builder::{CreateApplicationCommand, CreateApplicationCommandOption};
use serenity::model::application::command::{Command, CommandOption, CommandOptionType};
use serenity::model::id::GuildId;
use serenity::model::permissions::Permissions;

/// Which remote namespace a command definition lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandScope {
    /// Registered application-wide
    Global,
    /// Registered for a single guild
    Guild(GuildId),
}

impl fmt::Display for CommandScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandScope::Global => write!(f, "global"),
            CommandScope::Guild(guild_id) => write!(f, "guild {guild_id}"),
        }
    }
}

/// One choice offered for a string or integer parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterChoice {
    pub name: String,
    pub value: Value,
}

/// One command parameter. Parameters nest: subcommands and subcommand
/// groups carry their own `options`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub kind: CommandOptionType,
    pub name: String,
    pub description: String,
    pub required: bool,
    pub choices: Vec<ParameterChoice>,
    pub options: Vec<ParameterSpec>,
}

impl ParameterSpec {
    pub fn new(
        kind: CommandOptionType,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        ParameterSpec {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
            choices: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn string_choice(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.choices.push(ParameterChoice {
            name: name.into(),
            value: Value::String(value.into()),
        });
        self
    }

    pub fn int_choice(mut self, name: impl Into<String>, value: i64) -> Self {
        self.choices.push(ParameterChoice {
            name: name.into(),
            value: Value::from(value),
        });
        self
    }

    /// Add a nested parameter (subcommand / subcommand group members).
    pub fn option(mut self, nested: ParameterSpec) -> Self {
        self.options.push(nested);
        self
    }

    pub(crate) fn from_model(option: CommandOption) -> Self {
        ParameterSpec {
            kind: option.kind,
            name: option.name,
            description: option.description,
            required: option.required,
            choices: option
                .choices
                .into_iter()
                .map(|choice| ParameterChoice {
                    name: choice.name,
                    value: choice.value,
                })
                .collect(),
            options: option.options.into_iter().map(Self::from_model).collect(),
        }
    }

    fn apply<'a>(
        &self,
        builder: &'a mut CreateApplicationCommandOption,
    ) -> &'a mut CreateApplicationCommandOption {
        builder
            .kind(self.kind)
            .name(&self.name)
            .description(&self.description)
            .required(self.required);
        for choice in &self.choices {
            match &choice.value {
                Value::String(value) => {
                    builder.add_string_choice(&choice.name, value);
                }
                Value::Number(value) => {
                    if let Some(value) = value.as_i64() {
                        builder.add_int_choice(&choice.name, value as i32);
                    }
                }
                _ => {}
            }
        }
        for nested in &self.options {
            builder.create_sub_option(|sub| nested.apply(sub));
        }
        builder
    }
}

/// Declarative description of one slash command.
///
/// `scope` and `required_permissions` are local concerns: they steer
/// where the definition is synced and who may invoke it, and are never
/// part of the wire payload or of definition equality.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    pub options: Vec<ParameterSpec>,
    pub default_permission: bool,
    pub scope: CommandScope,
    pub required_permissions: Permissions,
}

impl CommandDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        CommandDefinition {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
            default_permission: true,
            scope: CommandScope::Global,
            required_permissions: Permissions::empty(),
        }
    }

    pub fn option(mut self, option: ParameterSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn default_permission(mut self, default_permission: bool) -> Self {
        self.default_permission = default_permission;
        self
    }

    pub fn required_permissions(mut self, permissions: Permissions) -> Self {
        self.required_permissions = permissions;
        self
    }

    /// Target the definition at a single guild instead of the global
    /// namespace. Also used to retarget commands when a development
    /// guild override is configured.
    pub fn guild(mut self, guild_id: GuildId) -> Self {
        self.scope = CommandScope::Guild(guild_id);
        self
    }

    /// Read a remote command back into definition shape. Remote records
    /// carry no local permission requirement.
    #[allow(deprecated)]
    pub(crate) fn from_model(command: Command, scope: CommandScope) -> Self {
        CommandDefinition {
            name: command.name,
            description: command.description,
            options: command
                .options
                .into_iter()
                .map(ParameterSpec::from_model)
                .collect(),
            default_permission: command.default_permission,
            scope,
            required_permissions: Permissions::empty(),
        }
    }

    /// Build the serenity wire representation of this definition.
    #[allow(deprecated)]
    pub fn to_builder(&self) -> CreateApplicationCommand {
        let mut builder = CreateApplicationCommand::default();
        builder
            .name(&self.name)
            .description(&self.description)
            .default_permission(self.default_permission);
        for option in &self.options {
            builder.create_option(|opt| option.apply(opt));
        }
        builder
    }
}
