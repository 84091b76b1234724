//! Command dispatch orchestration.

use minijinja::{Environment, context};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{DeliveryError, DeliveryRouter, DispatcherConfig};
use crate::command::{
    domain::{
        CommandDescriptor, CommandHandler, CommandName, DispatchOutcome, DispatchState,
        ExecutionError, GeneratorSpec, LocalNotification, ParsedArgs, UsageError,
    },
    ports::{
        CommandRegistry, CommandRegistryError, Conversation, DiagnosticLog, GeneratorInvoker,
        GeneratorLines, GeneratorReadError, GeneratorRequest, LaunchError, Notifier,
    },
};

/// The invocation could not be routed to a command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// No command with the name is registered.
    #[error("unknown command '/{0}'")]
    UnknownCommand(String),

    /// The registry could not be read.
    #[error(transparent)]
    Registry(#[from] CommandRegistryError),
}

/// Routes command invocations to their handlers.
///
/// Each call to [`CommandDispatcher::dispatch`] is independent. The
/// descriptor is cloned out of the registry before execution, so no
/// registry lock is held while a generator runs.
#[derive(Clone)]
pub struct CommandDispatcher<R, G, N, L>
where
    R: CommandRegistry,
    G: GeneratorInvoker,
    N: Notifier,
    L: DiagnosticLog,
{
    registry: Arc<R>,
    generator: Arc<G>,
    router: DeliveryRouter<N>,
    log: Arc<L>,
    config: DispatcherConfig,
}

enum Stop {
    Read(GeneratorReadError),
    Delivery(DeliveryError),
    Timeout,
    Cancelled,
}

impl<R, G, N, L> CommandDispatcher<R, G, N, L>
where
    R: CommandRegistry,
    G: GeneratorInvoker,
    N: Notifier,
    L: DiagnosticLog,
{
    /// Creates a dispatcher with the default configuration.
    #[must_use]
    pub fn new(registry: Arc<R>, generator: Arc<G>, notifier: Arc<N>, log: Arc<L>) -> Self {
        Self {
            registry,
            generator,
            router: DeliveryRouter::new(notifier),
            log,
            config: DispatcherConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Returns the registry commands are looked up in.
    #[must_use]
    pub const fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// Runs the command `name` with the raw argument tail `raw_tail` in
    /// `conversation`.
    ///
    /// Handler failures are reported through the returned
    /// [`DispatchOutcome`]; they never abort the host.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownCommand`] when `name` is not
    /// registered, or [`DispatchError::Registry`] when the registry cannot
    /// be read.
    pub async fn dispatch(
        &self,
        name: &str,
        raw_tail: &str,
        conversation: &dyn Conversation,
    ) -> Result<DispatchOutcome, DispatchError> {
        self.dispatch_with_cancel(name, raw_tail, conversation, &CancellationToken::new())
            .await
    }

    /// Like [`CommandDispatcher::dispatch`], stopping a running generator
    /// when `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownCommand`] when `name` is not
    /// registered, or [`DispatchError::Registry`] when the registry cannot
    /// be read.
    pub async fn dispatch_with_cancel(
        &self,
        name: &str,
        raw_tail: &str,
        conversation: &dyn Conversation,
        cancel: &CancellationToken,
    ) -> Result<DispatchOutcome, DispatchError> {
        let descriptor = self
            .registry
            .find_by_name(name)?
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_owned()))?
            .into_descriptor();

        let outcome = self
            .execute(&descriptor, raw_tail, conversation, cancel)
            .await;
        transition(descriptor.name(), outcome.state());
        info!(
            command = %descriptor.name(),
            conversation = %conversation.title(),
            state = %outcome.state(),
            lines = outcome.delivered_lines(),
            "command dispatched"
        );
        transition(descriptor.name(), DispatchState::Idle);
        Ok(outcome)
    }

    async fn execute(
        &self,
        descriptor: &CommandDescriptor,
        raw_tail: &str,
        conversation: &dyn Conversation,
        cancel: &CancellationToken,
    ) -> DispatchOutcome {
        let command = descriptor.name();
        transition(command, DispatchState::Parsing);

        let kind = conversation.kind();
        if !descriptor.admits(kind) {
            return DispatchOutcome::UsageError(UsageError::WrongContext {
                command: command.clone(),
                kind,
            });
        }
        let args = match descriptor.arg_format().parse(raw_tail) {
            Ok(args) => args,
            Err(source) => {
                return DispatchOutcome::UsageError(UsageError::ArgumentMismatch {
                    command: command.clone(),
                    help: descriptor.help_text().to_owned(),
                    source,
                });
            }
        };

        transition(command, DispatchState::Executing);
        match descriptor.handler() {
            CommandHandler::LogWrite => {
                self.log.write(descriptor.owner(), &args.joined());
                DispatchOutcome::Delivered { lines: 0 }
            }
            CommandHandler::GeneratorDelivery(spec) => {
                self.run_generator(command, spec, &args, conversation, cancel)
                    .await
            }
        }
    }

    async fn run_generator(
        &self,
        command: &CommandName,
        spec: &GeneratorSpec,
        args: &ParsedArgs,
        conversation: &dyn Conversation,
        cancel: &CancellationToken,
    ) -> DispatchOutcome {
        let environment = Environment::new();
        let request = match render_request(&environment, command, spec, args) {
            Ok(request) => request,
            Err(error) => return DispatchOutcome::ExecutionError(error),
        };
        let mut lines = match self.generator.launch(&request).await {
            Ok(lines) => lines,
            Err(error) => return self.notify_unavailable(&environment, command, spec, args, &error),
        };

        let counter = AtomicUsize::new(0);
        let stop = tokio::select! {
            biased;
            () = cancel.cancelled() => Some(Stop::Cancelled),
            () = tokio::time::sleep(self.config.generator_timeout) => Some(Stop::Timeout),
            result = self.pump(lines.as_mut(), conversation, &counter) => result.err(),
        };
        let exit = lines.close().await;
        debug!(
            command = %command,
            program = %spec.program(),
            code = ?exit.code,
            terminated = exit.terminated,
            "generator closed"
        );

        let delivered = counter.load(Ordering::Acquire);
        match stop {
            None => DispatchOutcome::Delivered { lines: delivered },
            Some(Stop::Read(read_error)) => {
                let launch_error = LaunchError::Read {
                    program: spec.program().to_owned(),
                    reason: read_error.to_string(),
                };
                self.notify_unavailable(&environment, command, spec, args, &launch_error)
            }
            Some(other) => {
                DispatchOutcome::ExecutionError(self.execution_error(command, spec, other, delivered))
            }
        }
    }

    fn execution_error(
        &self,
        command: &CommandName,
        spec: &GeneratorSpec,
        stop: Stop,
        delivered: usize,
    ) -> ExecutionError {
        match stop {
            Stop::Delivery(DeliveryError::UnsupportedConversationType(kind)) => {
                ExecutionError::UnsupportedConversationType { kind, delivered }
            }
            Stop::Delivery(DeliveryError::Send(error)) => {
                warn!(command = %command, %error, delivered, "delivery failed");
                ExecutionError::DeliveryFailed {
                    reason: error.to_string(),
                    delivered,
                }
            }
            Stop::Timeout => {
                warn!(
                    command = %command,
                    program = %spec.program(),
                    timeout = ?self.config.generator_timeout,
                    delivered,
                    "generator timed out"
                );
                ExecutionError::Timeout {
                    timeout: self.config.generator_timeout,
                    delivered,
                }
            }
            Stop::Cancelled => ExecutionError::Cancelled { delivered },
            Stop::Read(error) => ExecutionError::DeliveryFailed {
                reason: error.to_string(),
                delivered,
            },
        }
    }

    async fn pump(
        &self,
        lines: &mut dyn GeneratorLines,
        conversation: &dyn Conversation,
        delivered: &AtomicUsize,
    ) -> Result<(), Stop> {
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(()),
                Err(error) if delivered.load(Ordering::Acquire) == 0 => {
                    return Err(Stop::Read(error));
                }
                Err(error) => {
                    warn!(%error, "generator output ended early");
                    return Ok(());
                }
            };
            self.router
                .deliver(conversation, &line)
                .await
                .map_err(Stop::Delivery)?;
            delivered.fetch_add(1, Ordering::AcqRel);
        }
    }

    fn notify_unavailable(
        &self,
        environment: &Environment<'_>,
        command: &CommandName,
        spec: &GeneratorSpec,
        args: &ParsedArgs,
        error: &LaunchError,
    ) -> DispatchOutcome {
        warn!(command = %command, %error, "generator unavailable");
        let rendered = render(environment, command, spec.unavailable_title(), args).and_then(
            |title| {
                render(environment, command, spec.unavailable_body(), args)
                    .map(|body| LocalNotification::new(title, body, args.joined()))
            },
        );
        let notification = match rendered {
            Ok(notification) => notification,
            Err(render_error) => return DispatchOutcome::ExecutionError(render_error),
        };
        if let Err(notify_error) = self.router.notify_local(&notification) {
            warn!(command = %command, error = %notify_error, "local notification failed");
            return DispatchOutcome::ExecutionError(ExecutionError::Notification {
                reason: notify_error.to_string(),
            });
        }
        DispatchOutcome::NotifyShown {
            reason: error.to_string(),
        }
    }
}

fn transition(command: &CommandName, state: DispatchState) {
    debug!(command = %command, state = %state, "dispatch state changed");
}

fn render_request(
    environment: &Environment<'_>,
    command: &CommandName,
    spec: &GeneratorSpec,
    args: &ParsedArgs,
) -> Result<GeneratorRequest, ExecutionError> {
    let rendered = spec
        .argument_templates()
        .iter()
        .map(|template| render(environment, command, template, args))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(GeneratorRequest::new(spec.program().to_owned()).with_args(rendered))
}

fn render(
    environment: &Environment<'_>,
    command: &CommandName,
    template: &str,
    args: &ParsedArgs,
) -> Result<String, ExecutionError> {
    environment
        .render_str(
            template,
            context! { command => command.as_str(), args => args.as_slice() },
        )
        .map_err(|error| ExecutionError::Template {
            command: command.clone(),
            reason: error.to_string(),
        })
}
