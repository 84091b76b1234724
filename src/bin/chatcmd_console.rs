//! Runs the command dispatcher against the terminal.
//!
//! Usage:
//!
//! ```text
//! chatcmd_console [config-path]
//! ```
//!
//! Each line read from standard input is treated as chat input in a direct
//! message conversation. Lines starting with `/` are dispatched; delivered
//! command output is written to standard output, local notifications and
//! usage hints to standard error. `/help` lists the registered commands.
//!
//! The optional JSON document at `config-path` configures the fortune
//! plugin, for example:
//!
//! ```json
//! {
//!   "program": "/usr/games/fortune",
//!   "args": ["-s"]
//! }
//! ```
//!
//! `CHATCMD_FORTUNE_PROGRAM` overrides the program and
//! `CHATCMD_GENERATOR_TIMEOUT_MS` the generator timeout.

use async_trait::async_trait;
use chatcmd::command::{
    adapters::{ProcessGeneratorInvoker, TracingDiagnosticLog, memory::InMemoryCommandRegistry},
    domain::{ConversationKind, DispatchOutcome, LocalNotification, UsageError, split_command_line},
    ports::{
        CommandRegistry, CommandRegistryError, Conversation, ConversationError,
        ConversationResult, Notifier, NotifierError, NotifierResult,
    },
    services::{CommandDispatcher, ConfigError, DispatchError, DispatcherConfig},
};
use chatcmd::plugin::{FortunePlugin, FortunePluginConfig, PluginError};
use chatcmd::telemetry::{DEFAULT_LEVEL, init_tracing};
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::runtime::Builder;
use tokio::sync::{Mutex, mpsc};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

type ConsoleDispatcher = CommandDispatcher<
    InMemoryCommandRegistry,
    ProcessGeneratorInvoker,
    ConsoleNotifier,
    TracingDiagnosticLog,
>;

#[derive(Debug, Error)]
enum ConsoleError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("failed to read plugin config: {0}")]
    ConfigRead(#[source] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Plugin(#[from] PluginError),
    #[error(transparent)]
    Registry(#[from] CommandRegistryError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("console I/O failed: {0}")]
    Io(#[source] io::Error),
    #[error("standard error printer stopped")]
    StderrClosed,
    #[error("standard error printer failed: {0}")]
    Printer(#[source] tokio::task::JoinError),
}

/// Direct-message conversation printing delivered lines to `out`.
struct ConsoleConversation<W> {
    out: Mutex<W>,
}

impl<W> ConsoleConversation<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    async fn write_line(&self, text: &str) -> ConversationResult<()> {
        let mut out = self.out.lock().await;
        out.write_all(format!("{text}\n").as_bytes())
            .await
            .map_err(ConversationError::send)?;
        out.flush().await.map_err(ConversationError::send)
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> Conversation for ConsoleConversation<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn title(&self) -> String {
        "console".to_owned()
    }

    fn kind(&self) -> ConversationKind {
        ConversationKind::DirectMessage
    }

    async fn send_direct(&self, text: &str) -> ConversationResult<()> {
        self.write_line(text).await
    }

    async fn send_group(&self, text: &str) -> ConversationResult<()> {
        self.write_line(&format!("[group] {text}")).await
    }
}

/// Queues notices and hints for the standard error printer task.
#[derive(Debug, Clone)]
struct ConsoleNotifier {
    stderr: mpsc::UnboundedSender<String>,
}

impl ConsoleNotifier {
    fn hint(&self, message: &str) -> Result<(), ConsoleError> {
        self.stderr
            .send(message.to_owned())
            .map_err(|_| ConsoleError::StderrClosed)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &LocalNotification) -> NotifierResult<()> {
        self.stderr
            .send(format!(
                "[{}] {} ({})",
                notification.title, notification.body, notification.context
            ))
            .map_err(|_| NotifierError::Unavailable("standard error printer stopped".to_owned()))
    }
}

/// Writes queued lines to `out` until every sender is dropped.
async fn print_lines<W>(mut pending: mpsc::UnboundedReceiver<String>, out: &mut W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = pending.recv().await {
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
    }
    Ok(())
}

fn main() -> Result<(), BoxError> {
    let tracing_installed = init_tracing(DEFAULT_LEVEL);
    let plugin_config = load_plugin_config(std::env::args().skip(1))?;
    let dispatcher_config = DispatcherConfig::from_env().map_err(ConsoleError::from)?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ConsoleError::RuntimeInit)?;
    runtime
        .block_on(run(plugin_config, dispatcher_config, tracing_installed))
        .map_err(Into::into)
}

fn load_plugin_config(
    mut args: impl Iterator<Item = String>,
) -> Result<FortunePluginConfig, ConsoleError> {
    let base = match args.next() {
        Some(path) => {
            let document = std::fs::read_to_string(&path).map_err(ConsoleError::ConfigRead)?;
            FortunePluginConfig::from_json(&document)?
        }
        None => FortunePluginConfig::default(),
    };
    if let Some(extra) = args.next() {
        return Err(ConsoleError::InvalidArgs(format!(
            "unexpected argument '{extra}'; expected at most a config path"
        )));
    }
    Ok(base.with_lookup(|key| std::env::var(key).ok()))
}

async fn run(
    plugin_config: FortunePluginConfig,
    dispatcher_config: DispatcherConfig,
    tracing_installed: bool,
) -> Result<(), ConsoleError> {
    let (stderr, pending) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        let mut out = tokio::io::stderr();
        print_lines(pending, &mut out).await
    });
    let notifier = ConsoleNotifier { stderr };
    if !tracing_installed {
        notifier.hint("tracing was already initialised")?;
    }

    let session = serve(plugin_config, dispatcher_config, notifier).await;
    let printed = printer.await.map_err(ConsoleError::Printer)?;
    session?;
    printed.map_err(ConsoleError::Io)
}

async fn serve(
    plugin_config: FortunePluginConfig,
    dispatcher_config: DispatcherConfig,
    notifier: ConsoleNotifier,
) -> Result<(), ConsoleError> {
    let registry = Arc::new(InMemoryCommandRegistry::new());
    let loaded = FortunePlugin::new(plugin_config).load(registry.as_ref())?;
    let dispatcher = CommandDispatcher::new(
        Arc::clone(&registry),
        Arc::new(ProcessGeneratorInvoker::from_config(&dispatcher_config)),
        Arc::new(notifier.clone()),
        Arc::new(TracingDiagnosticLog::new()),
    )
    .with_config(dispatcher_config);

    let conversation = ConsoleConversation::new(tokio::io::stdout());
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = input.next_line().await.map_err(ConsoleError::Io)? {
        handle_line(&dispatcher, &conversation, &notifier, &line).await?;
    }

    loaded.unload(registry.as_ref())?;
    Ok(())
}

async fn handle_line(
    dispatcher: &ConsoleDispatcher,
    conversation: &dyn Conversation,
    notifier: &ConsoleNotifier,
    line: &str,
) -> Result<(), ConsoleError> {
    let Some((name, tail)) = split_command_line(line) else {
        if !line.trim().is_empty() {
            notifier.hint("not a command; commands start with '/'")?;
        }
        return Ok(());
    };
    if name == "help" && dispatcher.registry().find_by_name(name)?.is_none() {
        for command in dispatcher.registry().list()? {
            notifier.hint(command.descriptor().help_text())?;
        }
        return Ok(());
    }

    match dispatcher.dispatch(name, tail, conversation).await {
        Ok(outcome) => report(notifier, &outcome),
        Err(DispatchError::UnknownCommand(unknown)) => {
            notifier.hint(&format!("unknown command '/{unknown}'; try /help"))
        }
        Err(DispatchError::Registry(error)) => Err(error.into()),
    }
}

fn report(notifier: &ConsoleNotifier, outcome: &DispatchOutcome) -> Result<(), ConsoleError> {
    match outcome {
        DispatchOutcome::Delivered { .. } | DispatchOutcome::NotifyShown { .. } => Ok(()),
        DispatchOutcome::UsageError(UsageError::ArgumentMismatch { help, source, .. }) => {
            notifier.hint(&format!("{source}. Usage: {help}"))
        }
        DispatchOutcome::UsageError(error) => notifier.hint(&error.to_string()),
        DispatchOutcome::ExecutionError(error) => notifier.hint(&error.to_string()),
    }
}

#[cfg(test)]
#[path = "chatcmd_console/tests.rs"]
mod tests;
