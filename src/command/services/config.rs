//! Dispatcher configuration.

use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding [`DispatcherConfig::generator_timeout`],
/// in milliseconds.
pub const GENERATOR_TIMEOUT_ENV: &str = "CHATCMD_GENERATOR_TIMEOUT_MS";

/// Environment variable overriding [`DispatcherConfig::termination_grace`],
/// in milliseconds.
pub const TERMINATION_GRACE_ENV: &str = "CHATCMD_TERMINATION_GRACE_MS";

/// Limits applied to generator-backed commands.
///
/// # Examples
///
/// ```
/// use chatcmd::command::services::DispatcherConfig;
/// use std::time::Duration;
///
/// let config = DispatcherConfig::default();
/// assert_eq!(config.generator_timeout, Duration::from_secs(10));
///
/// let strict = DispatcherConfig::strict();
/// assert!(strict.generator_timeout < config.generator_timeout);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Upper bound on one generator invocation, delivery included.
    pub generator_timeout: Duration,
    /// Time a generator gets to exit after `SIGTERM` before it is killed.
    ///
    /// Applied by the invoker, see
    /// [`ProcessGeneratorInvoker::from_config`](crate::command::adapters::ProcessGeneratorInvoker::from_config).
    pub termination_grace: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            generator_timeout: Duration::from_secs(10),
            termination_grace: Duration::from_millis(500),
        }
    }
}

impl DispatcherConfig {
    /// Creates a configuration with short limits.
    ///
    /// Useful for interactive hosts that must stay responsive.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            generator_timeout: Duration::from_secs(2),
            termination_grace: Duration::from_millis(100),
        }
    }

    /// Sets the generator timeout.
    #[must_use]
    pub const fn with_generator_timeout(mut self, timeout: Duration) -> Self {
        self.generator_timeout = timeout;
        self
    }

    /// Reads overrides from the process environment on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDuration`] when a variable is set but
    /// is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup` on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDuration`] when a value is present but
    /// is not a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            generator_timeout: duration_override(&lookup, GENERATOR_TIMEOUT_ENV)?
                .unwrap_or(defaults.generator_timeout),
            termination_grace: duration_override(&lookup, TERMINATION_GRACE_ENV)?
                .unwrap_or(defaults.termination_grace),
        })
    }
}

fn duration_override(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let invalid = || ConfigError::InvalidDuration {
        key: key.to_owned(),
        value: raw.clone(),
    };
    let millis: u64 = raw.trim().parse().map_err(|_| invalid())?;
    if millis == 0 {
        return Err(invalid());
    }
    Ok(Some(Duration::from_millis(millis)))
}

/// Configuration could not be read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration variable is not a positive number of milliseconds.
    #[error("{key} must be a positive number of milliseconds, got '{value}'")]
    InvalidDuration {
        /// Variable name.
        key: String,
        /// Rejected value.
        value: String,
    },
}
