//! Fortune plugin configuration.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use super::PluginError;

/// Environment variable overriding [`FortunePluginConfig::program`].
pub const FORTUNE_PROGRAM_ENV: &str = "CHATCMD_FORTUNE_PROGRAM";

/// Settings for the fortune plugin.
///
/// Every field is optional in serialised form; missing fields take their
/// defaults.
///
/// # Examples
///
/// ```
/// use chatcmd::plugin::FortunePluginConfig;
///
/// let config = FortunePluginConfig::from_json(r#"{ "program": "/opt/bin/fortune" }"#)
///     .expect("valid configuration");
/// assert_eq!(config.program.as_str(), "/opt/bin/fortune");
/// assert_eq!(config.fortune_command, "fortune");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FortunePluginConfig {
    /// Generator program run by the fortune command.
    pub program: Utf8PathBuf,
    /// Argument templates passed to the program.
    pub args: Vec<String>,
    /// Name of the diagnostic log command.
    pub log_command: String,
    /// Name of the fortune command.
    pub fortune_command: String,
}

impl Default for FortunePluginConfig {
    fn default() -> Self {
        Self {
            program: Utf8PathBuf::from("/usr/games/fortune"),
            args: Vec::new(),
            log_command: "log".to_owned(),
            fortune_command: "fortune".to_owned(),
        }
    }
}

impl FortunePluginConfig {
    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Config`] when the document is malformed or
    /// contains unknown fields.
    pub fn from_json(document: &str) -> Result<Self, PluginError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Applies overrides from the process environment to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    #[must_use]
    pub fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(program) = lookup(FORTUNE_PROGRAM_ENV).filter(|value| !value.trim().is_empty())
        {
            self.program = Utf8PathBuf::from(program);
        }
        self
    }

    /// Sets the generator program.
    #[must_use]
    pub fn with_program(mut self, program: impl AsRef<Utf8Path>) -> Self {
        self.program = program.as_ref().to_owned();
        self
    }
}
