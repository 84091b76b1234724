//! Plugins that contribute commands to a registry.
//!
//! A plugin builds its command descriptors from configuration, registers
//! them together when loaded and removes them together when unloaded. The
//! [`LoadedPlugin`] handle returned by a load is the only way to unregister
//! the plugin's commands.

mod config;
mod fortune;

pub use config::{FORTUNE_PROGRAM_ENV, FortunePluginConfig};
pub use fortune::{FortunePlugin, LoadedPlugin, PluginError, PluginInfo};
