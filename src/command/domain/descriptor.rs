//! Command descriptors and registered command records.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{
    ArgFormat, CommandDomainError, CommandName, ConversationKind, RegistrationId, UsageContext,
};

/// Ordering hint used when several commands are listed or offered.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CommandPriority {
    /// Listed after default-priority commands.
    Low,
    /// Standard priority.
    #[default]
    Default,
    /// Listed before default-priority commands.
    High,
}

/// External program used by a generator-style command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSpec {
    program: Utf8PathBuf,
    #[serde(default)]
    argument_templates: Vec<String>,
    unavailable_title: String,
    unavailable_body: String,
}

impl GeneratorSpec {
    /// Creates a generator specification for `program`.
    ///
    /// The unavailable notice defaults to `"<program> is not available"`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandDomainError::EmptyGeneratorProgram`] when the path is
    /// empty.
    pub fn new(program: impl Into<Utf8PathBuf>) -> Result<Self, CommandDomainError> {
        let program = program.into();
        if program.as_str().trim().is_empty() {
            return Err(CommandDomainError::EmptyGeneratorProgram);
        }
        let display_name = program.file_name().unwrap_or(program.as_str()).to_owned();
        Ok(Self {
            program,
            argument_templates: Vec::new(),
            unavailable_title: "Command Notification".to_owned(),
            unavailable_body: format!("{display_name} is not available"),
        })
    }

    /// Appends a program argument.
    ///
    /// Arguments are `minijinja` templates rendered per invocation with
    /// `command` (the command name) and `args` (the parsed arguments) in
    /// scope, e.g. `{{ args[0] }}`.
    #[must_use]
    pub fn with_argument(mut self, template: impl Into<String>) -> Self {
        self.argument_templates.push(template.into());
        self
    }

    /// Sets the notice shown locally when the program cannot be launched.
    #[must_use]
    pub fn with_unavailable_notice(
        mut self,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.unavailable_title = title.into();
        self.unavailable_body = body.into();
        self
    }

    /// Returns the program path.
    #[must_use]
    pub fn program(&self) -> &Utf8Path {
        &self.program
    }

    /// Returns the argument templates.
    #[must_use]
    pub fn argument_templates(&self) -> &[String] {
        &self.argument_templates
    }

    /// Returns the unavailable notice title.
    #[must_use]
    pub fn unavailable_title(&self) -> &str {
        &self.unavailable_title
    }

    /// Returns the unavailable notice body.
    #[must_use]
    pub fn unavailable_body(&self) -> &str {
        &self.unavailable_body
    }
}

/// Handler kind executed for a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandHandler {
    /// Writes the parsed arguments to the diagnostic log.
    LogWrite,
    /// Runs a generator and delivers each output line to the conversation.
    GeneratorDelivery(GeneratorSpec),
}

/// Immutable description of a registrable command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    name: CommandName,
    arg_format: ArgFormat,
    priority: CommandPriority,
    contexts: BTreeSet<UsageContext>,
    help_text: String,
    handler: CommandHandler,
    owner: String,
}

impl CommandDescriptor {
    /// Creates a descriptor with default priority, usable in direct
    /// messages and group chats.
    #[must_use]
    pub fn new(name: CommandName, arg_format: ArgFormat, handler: CommandHandler) -> Self {
        Self {
            name,
            arg_format,
            priority: CommandPriority::Default,
            contexts: UsageContext::all().into_iter().collect(),
            help_text: String::new(),
            handler,
            owner: String::new(),
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: CommandPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Replaces the usage contexts.
    #[must_use]
    pub fn with_contexts(mut self, contexts: impl IntoIterator<Item = UsageContext>) -> Self {
        self.contexts = contexts.into_iter().collect();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    /// Records the plugin that owns the command.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Checks descriptor-level invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CommandDomainError::EmptyUsageContexts`] when no usage
    /// context is declared.
    pub fn validate(&self) -> Result<(), CommandDomainError> {
        if self.contexts.is_empty() {
            return Err(CommandDomainError::EmptyUsageContexts(
                self.name.as_str().to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns `true` when the command may run in a conversation of `kind`.
    ///
    /// Conversations without a usage context ([`ConversationKind::Other`])
    /// are admitted; the delivery router rejects them if output needs a
    /// channel.
    #[must_use]
    pub fn admits(&self, kind: ConversationKind) -> bool {
        kind.usage_context()
            .is_none_or(|context| self.contexts.contains(&context))
    }

    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        &self.name
    }

    /// Returns the argument format.
    #[must_use]
    pub const fn arg_format(&self) -> &ArgFormat {
        &self.arg_format
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> CommandPriority {
        self.priority
    }

    /// Returns the usage contexts.
    #[must_use]
    pub const fn contexts(&self) -> &BTreeSet<UsageContext> {
        &self.contexts
    }

    /// Returns the help text.
    #[must_use]
    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    /// Returns the handler.
    #[must_use]
    pub const fn handler(&self) -> &CommandHandler {
        &self.handler
    }

    /// Returns the owning plugin identifier, or the command name when no
    /// owner was recorded.
    #[must_use]
    pub fn owner(&self) -> &str {
        if self.owner.is_empty() {
            self.name.as_str()
        } else {
            &self.owner
        }
    }
}

/// A descriptor held by a registry together with its registration handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredCommand {
    id: RegistrationId,
    descriptor: CommandDescriptor,
    registered_at: DateTime<Utc>,
}

impl RegisteredCommand {
    /// Creates a registration record with a fresh identifier.
    #[must_use]
    pub fn new(descriptor: CommandDescriptor, clock: &impl Clock) -> Self {
        Self {
            id: RegistrationId::new(),
            descriptor,
            registered_at: clock.utc(),
        }
    }

    /// Returns the registration identifier.
    #[must_use]
    pub const fn id(&self) -> RegistrationId {
        self.id
    }

    /// Returns the registered descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Consumes the record, returning the descriptor.
    #[must_use]
    pub fn into_descriptor(self) -> CommandDescriptor {
        self.descriptor
    }
}
