//! Command registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation
//!
//! Maps command names to their registered command (definition plus
//! handler). Populated once at startup and read-only afterwards; the
//! dispatcher resolves incoming interactions against it and the
//! synchronizer feeds its definitions to the remote registry.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error};

use super::definition::CommandDefinition;
use super::handler::SlashCommand;

/// A command as held by the registry: the definition captured at
/// registration time plus the handler behind it.
pub struct RegisteredCommand {
    pub definition: CommandDefinition,
    pub command: Arc<dyn SlashCommand>,
}

/// Registry mapping command names to registered commands.
///
/// Names are unique across scopes: incoming interactions carry only a
/// name, so dispatch needs a single flat namespace.
#[derive(Default)]
pub struct CommandRegistry {
    entries: HashMap<String, RegisteredCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        CommandRegistry {
            entries: HashMap::new(),
        }
    }

    /// Register a command under its definition's name.
    ///
    /// A duplicate name is a configuration error: it is logged and the
    /// command is not added, leaving the first registration in place.
    pub fn register(&mut self, command: Arc<dyn SlashCommand>) {
        let definition = command.definition();
        if self.entries.contains_key(&definition.name) {
            error!("Command '{}' is already registered", definition.name);
            return;
        }
        debug!("Registered command '{}'", definition.name);
        self.entries.insert(
            definition.name.clone(),
            RegisteredCommand {
                definition,
                command,
            },
        );
    }

    /// Look up a registered command by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        self.entries.get(name)
    }

    /// Check if a command name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered definitions, in no particular order.
    pub fn definitions(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.entries.values().map(|entry| &entry.definition)
    }
}
