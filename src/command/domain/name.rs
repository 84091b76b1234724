//! Validated command name type.

use super::CommandDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LENGTH: usize = 64;

/// Validated command name, stored without the leading slash.
///
/// Names are trimmed and lowercased, and a single leading `/` is stripped,
/// so `"/Fortune"` and `"fortune"` name the same command. Only characters
/// in `[a-z0-9_-]` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommandName(String);

impl CommandName {
    /// Creates a validated command name.
    ///
    /// # Errors
    ///
    /// Returns [`CommandDomainError::EmptyCommandName`] when the value is
    /// empty after normalisation, [`CommandDomainError::InvalidCommandName`]
    /// for characters outside `[a-z0-9_-]`, or
    /// [`CommandDomainError::CommandNameTooLong`] past 64 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, CommandDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let normalized = trimmed
            .strip_prefix('/')
            .unwrap_or(trimmed)
            .to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(CommandDomainError::EmptyCommandName);
        }

        if normalized.len() > MAX_NAME_LENGTH {
            return Err(CommandDomainError::CommandNameTooLong(raw));
        }

        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_'));
        if !is_valid {
            return Err(CommandDomainError::InvalidCommandName(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the command name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommandName {
    type Error = CommandDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommandName> for String {
    fn from(value: CommandName) -> Self {
        value.0
    }
}

impl AsRef<str> for CommandName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
