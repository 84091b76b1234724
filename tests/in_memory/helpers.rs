//! Shared helpers for in-memory dispatch integration tests.

use std::sync::Arc;

use chatcmd::command::{
    adapters::memory::{
        InMemoryCommandRegistry, InMemoryDiagnosticLog, InMemoryGeneratorInvoker,
        InMemoryNotifier, ScriptedGenerator,
    },
    services::CommandDispatcher,
};
use chatcmd::plugin::{FortunePlugin, FortunePluginConfig, LoadedPlugin};

/// Generator path used by the in-memory fortune plugin.
pub const FORTUNE_PROGRAM: &str = "/usr/games/fortune";

/// Dispatcher wired to in-memory adapters.
pub type TestDispatcher = CommandDispatcher<
    InMemoryCommandRegistry,
    InMemoryGeneratorInvoker,
    InMemoryNotifier,
    InMemoryDiagnosticLog,
>;

/// A loaded fortune plugin and the adapters observing it.
pub struct FortuneHost {
    pub registry: Arc<InMemoryCommandRegistry>,
    pub generator: Arc<InMemoryGeneratorInvoker>,
    pub notifier: Arc<InMemoryNotifier>,
    pub log: Arc<InMemoryDiagnosticLog>,
    pub dispatcher: TestDispatcher,
    pub loaded: Option<LoadedPlugin>,
}

impl FortuneHost {
    /// Loads the fortune plugin over `generator`.
    pub fn with_generator(invoker: InMemoryGeneratorInvoker) -> Self {
        let registry = Arc::new(InMemoryCommandRegistry::new());
        let loaded = FortunePlugin::new(FortunePluginConfig::default())
            .load(registry.as_ref())
            .expect("fortune plugin loads");
        let generator = Arc::new(invoker);
        let notifier = Arc::new(InMemoryNotifier::new());
        let log = Arc::new(InMemoryDiagnosticLog::new());
        let dispatcher = CommandDispatcher::new(
            Arc::clone(&registry),
            Arc::clone(&generator),
            Arc::clone(&notifier),
            Arc::clone(&log),
        );
        Self {
            registry,
            generator,
            notifier,
            log,
            dispatcher,
            loaded: Some(loaded),
        }
    }

    /// Loads the fortune plugin with `script` as the fortune program.
    pub fn scripted(script: ScriptedGenerator) -> Self {
        Self::with_generator(InMemoryGeneratorInvoker::new().with_script(FORTUNE_PROGRAM, script))
    }

    /// Loads the fortune plugin without any fortune program installed.
    pub fn without_fortune() -> Self {
        Self::with_generator(InMemoryGeneratorInvoker::new())
    }

    /// Unloads the plugin if it is still loaded.
    pub fn unload(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            loaded
                .unload(self.registry.as_ref())
                .expect("fortune plugin unloads");
        }
    }
}
