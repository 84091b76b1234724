//! The fortune plugin: `/log` and `/fortune`.

use thiserror::Error;
use tracing::{info, warn};

use super::FortunePluginConfig;
use crate::command::{
    domain::{
        ArgFormat, ArgSlot, CommandDescriptor, CommandDomainError, CommandHandler, CommandName,
        CommandPriority, GeneratorSpec, RegistrationId, UsageContext,
    },
    ports::{CommandRegistry, CommandRegistryError},
};

const PLUGIN_ID: &str = "fortune";
const LOG_HELP: &str = "log <message>: Prints a message to the debug log.";
const FORTUNE_HELP: &str = "fortune <word>: Pops up a fortune with the word you enter.";
const UNAVAILABLE_TITLE: &str = "Fortune Notification";
const UNAVAILABLE_BODY: &str = "fortune command not available";

/// Errors raised while loading or unloading a plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A descriptor could not be built from the configuration.
    #[error(transparent)]
    Domain(#[from] CommandDomainError),
    /// The registry rejected a registration or removal.
    #[error(transparent)]
    Registry(#[from] CommandRegistryError),
    /// The configuration document is invalid.
    #[error("invalid plugin configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Static identification of a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    /// Stable identifier, recorded as the owner of registered commands.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Plugin version.
    pub version: &'static str,
    /// One-line summary.
    pub summary: &'static str,
}

/// Contributes a diagnostic `/log` command and a generator-backed
/// `/fortune` command.
///
/// # Examples
///
/// ```
/// use chatcmd::command::adapters::memory::InMemoryCommandRegistry;
/// use chatcmd::command::ports::CommandRegistry;
/// use chatcmd::plugin::{FortunePlugin, FortunePluginConfig};
///
/// let registry = InMemoryCommandRegistry::new();
/// let plugin = FortunePlugin::new(FortunePluginConfig::default());
/// let loaded = plugin.load(&registry).expect("plugin loads");
/// assert!(registry.find_by_name("/fortune").expect("lookup").is_some());
///
/// loaded.unload(&registry).expect("plugin unloads");
/// assert!(registry.is_empty().expect("registry readable"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FortunePlugin {
    config: FortunePluginConfig,
}

impl FortunePlugin {
    /// Creates the plugin from `config`.
    #[must_use]
    pub const fn new(config: FortunePluginConfig) -> Self {
        Self { config }
    }

    /// Returns the plugin identification.
    #[must_use]
    pub const fn info() -> PluginInfo {
        PluginInfo {
            id: PLUGIN_ID,
            name: "Fortune",
            version: env!("CARGO_PKG_VERSION"),
            summary: "Fortune from GNU/Linux",
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &FortunePluginConfig {
        &self.config
    }

    /// Builds the descriptors the plugin registers, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Domain`] when a configured command name or
    /// the generator program is invalid.
    pub fn descriptors(&self) -> Result<Vec<CommandDescriptor>, PluginError> {
        let log = CommandDescriptor::new(
            CommandName::new(&self.config.log_command)?,
            ArgFormat::new([ArgSlot::RestOfLine])?,
            CommandHandler::LogWrite,
        )
        .with_contexts(UsageContext::all())
        .with_help(LOG_HELP)
        .with_owner(PLUGIN_ID);

        let generator = self
            .config
            .args
            .iter()
            .fold(GeneratorSpec::new(self.config.program.clone())?, |spec, arg| {
                spec.with_argument(arg.clone())
            })
            .with_unavailable_notice(UNAVAILABLE_TITLE, UNAVAILABLE_BODY);
        let fortune = CommandDescriptor::new(
            CommandName::new(&self.config.fortune_command)?,
            ArgFormat::new([ArgSlot::SingleWord])?,
            CommandHandler::GeneratorDelivery(generator),
        )
        .with_priority(CommandPriority::High)
        .with_contexts(UsageContext::all())
        .with_help(FORTUNE_HELP)
        .with_owner(PLUGIN_ID);

        Ok(vec![log, fortune])
    }

    /// Registers every plugin command.
    ///
    /// Registration is all or nothing: when one command fails, those
    /// already registered are removed again before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Domain`] for invalid configuration and
    /// [`PluginError::Registry`] when the registry rejects a command.
    pub fn load<R>(&self, registry: &R) -> Result<LoadedPlugin, PluginError>
    where
        R: CommandRegistry + ?Sized,
    {
        let mut ids = Vec::new();
        for descriptor in self.descriptors()? {
            let name = descriptor.name().clone();
            match registry.register(descriptor) {
                Ok(id) => ids.push(id),
                Err(error) => {
                    warn!(plugin = PLUGIN_ID, command = %name, %error, "plugin load rolled back");
                    roll_back(registry, &ids);
                    return Err(error.into());
                }
            }
        }
        info!(plugin = PLUGIN_ID, commands = ids.len(), "plugin loaded");
        Ok(LoadedPlugin { ids })
    }
}

fn roll_back<R>(registry: &R, ids: &[RegistrationId])
where
    R: CommandRegistry + ?Sized,
{
    for id in ids {
        if let Err(error) = registry.unregister(*id) {
            warn!(plugin = PLUGIN_ID, %id, %error, "failed to roll back registration");
        }
    }
}

/// Registration handles held by a loaded plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "dropping a loaded plugin leaves its commands registered"]
pub struct LoadedPlugin {
    ids: Vec<RegistrationId>,
}

impl LoadedPlugin {
    /// Returns the registration ids in registration order.
    #[must_use]
    pub fn ids(&self) -> &[RegistrationId] {
        &self.ids
    }

    /// Unregisters every command the plugin registered.
    ///
    /// All ids are attempted even when one fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`PluginError::Registry`] encountered.
    pub fn unload<R>(self, registry: &R) -> Result<(), PluginError>
    where
        R: CommandRegistry + ?Sized,
    {
        let mut first_error = None;
        for id in self.ids {
            if let Err(error) = registry.unregister(id) {
                warn!(plugin = PLUGIN_ID, %id, %error, "failed to unregister command");
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
        if let Some(error) = first_error {
            return Err(error.into());
        }
        info!(plugin = PLUGIN_ID, "plugin unloaded");
        Ok(())
    }
}
