//! Command registry port.
//!
//! The registry is the process-wide command table. Entries are unique by
//! name and are removed only through the id returned at registration.

use thiserror::Error;

use crate::command::domain::{
    CommandDescriptor, CommandDomainError, CommandName, RegisteredCommand, RegistrationId,
};

/// Result type for command registry operations.
pub type CommandRegistryResult<T> = Result<T, CommandRegistryError>;

/// Port for registering and looking up commands.
///
/// Implementations must serialise `register`/`unregister` against
/// concurrent lookups.
pub trait CommandRegistry: Send + Sync {
    /// Adds a command to the table.
    ///
    /// # Errors
    ///
    /// Returns [`CommandRegistryError::DuplicateName`] when a command with
    /// the same name is registered, or
    /// [`CommandRegistryError::InvalidDescriptor`] when the descriptor fails
    /// validation.
    fn register(&self, descriptor: CommandDescriptor) -> CommandRegistryResult<RegistrationId>;

    /// Removes a command from the table.
    ///
    /// # Errors
    ///
    /// Returns [`CommandRegistryError::UnknownId`] when no command holds
    /// `id`.
    fn unregister(&self, id: RegistrationId) -> CommandRegistryResult<()>;

    /// Finds a command by name, with or without the leading slash.
    ///
    /// # Errors
    ///
    /// Returns [`CommandRegistryError::Unavailable`] when registry access
    /// fails.
    fn find_by_name(&self, name: &str) -> CommandRegistryResult<Option<RegisteredCommand>>;

    /// Lists registered commands, highest priority first, then by name.
    ///
    /// # Errors
    ///
    /// Returns [`CommandRegistryError::Unavailable`] when registry access
    /// fails.
    fn list(&self) -> CommandRegistryResult<Vec<RegisteredCommand>>;

    /// Returns the help text of a command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandRegistryError::Unavailable`] when registry access
    /// fails.
    fn help(&self, name: &str) -> CommandRegistryResult<Option<String>> {
        Ok(self
            .find_by_name(name)?
            .map(|command| command.descriptor().help_text().to_owned()))
    }

    /// Returns `true` when no command is registered.
    ///
    /// # Errors
    ///
    /// Returns [`CommandRegistryError::Unavailable`] when registry access
    /// fails.
    fn is_empty(&self) -> CommandRegistryResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns the number of registered commands.
    ///
    /// # Errors
    ///
    /// Returns [`CommandRegistryError::Unavailable`] when registry access
    /// fails.
    fn len(&self) -> CommandRegistryResult<usize> {
        Ok(self.list()?.len())
    }
}

/// Errors for command registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandRegistryError {
    /// A command with the same name is already registered.
    #[error("command '/{0}' is already registered")]
    DuplicateName(CommandName),

    /// No command is registered under the identifier.
    #[error("no command registered with id {0}")]
    UnknownId(RegistrationId),

    /// The descriptor violates a domain invariant.
    #[error("invalid command descriptor: {0}")]
    InvalidDescriptor(#[from] CommandDomainError),

    /// General storage or adapter failure.
    #[error("command registry unavailable: {0}")]
    Unavailable(String),
}
