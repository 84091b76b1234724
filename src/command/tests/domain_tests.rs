//! Unit tests for command domain types.

use crate::command::domain::{
    ArgFormat, ArgumentMismatchError, CommandDescriptor, CommandDomainError, CommandHandler,
    CommandName, CommandPriority, ConversationKind, DispatchOutcome, DispatchState,
    ExecutionError, GeneratorSpec, RegisteredCommand, UsageContext, UsageError,
    split_command_line,
};
use mockable::DefaultClock;
use rstest::rstest;
use std::time::Duration;

fn log_descriptor() -> CommandDescriptor {
    CommandDescriptor::new(
        CommandName::new("log").expect("valid name"),
        ArgFormat::parse_format("s").expect("valid format"),
        CommandHandler::LogWrite,
    )
}

// ── CommandName ────────────────────────────────────────────────────

#[rstest]
#[case("fortune", "fortune")]
#[case("/fortune", "fortune")]
#[case("  /Fortune ", "fortune")]
#[case("my-cmd_2", "my-cmd_2")]
fn command_names_are_normalised(#[case] input: &str, #[case] expected: &str) {
    let name = CommandName::new(input).expect("valid name");
    assert_eq!(name.as_str(), expected);
}

#[rstest]
#[case("", CommandDomainError::EmptyCommandName)]
#[case("/", CommandDomainError::EmptyCommandName)]
#[case("has space", CommandDomainError::InvalidCommandName("has space".to_owned()))]
#[case("emoji🙂", CommandDomainError::InvalidCommandName("emoji🙂".to_owned()))]
fn invalid_command_names_are_rejected(#[case] input: &str, #[case] expected: CommandDomainError) {
    assert_eq!(CommandName::new(input), Err(expected));
}

#[rstest]
fn overlong_command_names_are_rejected() {
    let long = "a".repeat(65);
    assert!(matches!(
        CommandName::new(long),
        Err(CommandDomainError::CommandNameTooLong(_))
    ));
    assert!(CommandName::new("a".repeat(64)).is_ok());
}

// ── Command line splitting ─────────────────────────────────────────

#[rstest]
#[case("/log hello  world", Some(("log", "hello  world")))]
#[case("/fortune", Some(("fortune", "")))]
#[case("  /fortune\tcookie", Some(("fortune", "cookie")))]
#[case("plain text", None)]
#[case("/", None)]
#[case("/ log", None)]
fn command_lines_split_into_name_and_tail(
    #[case] input: &str,
    #[case] expected: Option<(&str, &str)>,
) {
    assert_eq!(split_command_line(input), expected);
}

// ── Descriptors ────────────────────────────────────────────────────

#[rstest]
fn descriptors_default_to_every_context() {
    let descriptor = log_descriptor();
    assert_eq!(descriptor.priority(), CommandPriority::Default);
    assert!(descriptor.admits(ConversationKind::DirectMessage));
    assert!(descriptor.admits(ConversationKind::GroupChat));
    assert!(descriptor.validate().is_ok());
}

#[rstest]
fn restricted_descriptor_rejects_other_contexts() {
    let descriptor = log_descriptor().with_contexts([UsageContext::DirectMessage]);
    assert!(descriptor.admits(ConversationKind::DirectMessage));
    assert!(!descriptor.admits(ConversationKind::GroupChat));
    assert!(descriptor.admits(ConversationKind::Other));
}

#[rstest]
fn descriptor_without_contexts_is_invalid() {
    let descriptor = log_descriptor().with_contexts(std::iter::empty::<UsageContext>());
    assert_eq!(
        descriptor.validate(),
        Err(CommandDomainError::EmptyUsageContexts("log".to_owned()))
    );
}

#[rstest]
fn owner_falls_back_to_command_name() {
    let descriptor = log_descriptor();
    assert_eq!(descriptor.owner(), "log");
    assert_eq!(descriptor.with_owner("fortune").owner(), "fortune");
}

#[rstest]
fn command_priorities_are_ordered() {
    assert!(CommandPriority::High > CommandPriority::Default);
    assert!(CommandPriority::Default > CommandPriority::Low);
}

#[rstest]
fn descriptor_survives_json() {
    let generator = GeneratorSpec::new("/usr/games/fortune")
        .expect("valid program")
        .with_argument("{{ args[0] }}");
    let descriptor = CommandDescriptor::new(
        CommandName::new("fortune").expect("valid name"),
        ArgFormat::parse_format("w").expect("valid format"),
        CommandHandler::GeneratorDelivery(generator),
    )
    .with_priority(CommandPriority::High);

    let json = serde_json::to_value(&descriptor).expect("descriptor serializes");
    assert_eq!(json["arg_format"], "w");
    assert_eq!(json["handler"]["kind"], "generator_delivery");

    let decoded: CommandDescriptor = serde_json::from_value(json).expect("descriptor decodes");
    assert_eq!(decoded, descriptor);
}

#[rstest]
fn registered_command_keeps_descriptor() {
    let registered = RegisteredCommand::new(log_descriptor(), &DefaultClock);
    assert_eq!(registered.descriptor().name().as_str(), "log");
    assert_eq!(registered.clone().into_descriptor(), log_descriptor());
}

// ── GeneratorSpec ──────────────────────────────────────────────────

#[rstest]
fn generator_spec_has_default_notice() {
    let spec = GeneratorSpec::new("/usr/games/fortune").expect("valid program");
    assert_eq!(spec.unavailable_title(), "Command Notification");
    assert_eq!(spec.unavailable_body(), "fortune is not available");
    assert!(spec.argument_templates().is_empty());
}

#[rstest]
#[case("")]
#[case("   ")]
fn generator_spec_rejects_empty_program(#[case] program: &str) {
    assert_eq!(
        GeneratorSpec::new(program),
        Err(CommandDomainError::EmptyGeneratorProgram)
    );
}

// ── Outcomes ───────────────────────────────────────────────────────

#[rstest]
#[case(DispatchOutcome::Delivered { lines: 3 }, DispatchState::Delivered, 3)]
#[case(
    DispatchOutcome::NotifyShown { reason: "missing".to_owned() },
    DispatchState::NotifyShown,
    0
)]
#[case(
    DispatchOutcome::ExecutionError(ExecutionError::Timeout {
        timeout: Duration::from_millis(50),
        delivered: 2,
    }),
    DispatchState::Failed,
    2
)]
#[case(
    DispatchOutcome::UsageError(UsageError::ArgumentMismatch {
        command: CommandName::new("fortune").expect("valid name"),
        help: String::new(),
        source: ArgumentMismatchError::Unexpected { remainder: "x".to_owned() },
    }),
    DispatchState::Failed,
    0
)]
fn outcomes_map_to_terminal_states(
    #[case] outcome: DispatchOutcome,
    #[case] state: DispatchState,
    #[case] lines: usize,
) {
    assert_eq!(outcome.state(), state);
    assert!(outcome.state().is_terminal());
    assert_eq!(outcome.delivered_lines(), lines);
}

#[rstest]
fn non_terminal_states() {
    for state in [
        DispatchState::Idle,
        DispatchState::Parsing,
        DispatchState::Executing,
    ] {
        assert!(!state.is_terminal(), "{state} should not be terminal");
    }
}
