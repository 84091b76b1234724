//! End-to-end dispatch flows through the fortune plugin.

use crate::in_memory::helpers::FortuneHost;
use chatcmd::command::{
    adapters::memory::{DeliveryChannel, InMemoryConversation, ScriptedGenerator},
    domain::{
        ConversationKind, DispatchOutcome, ExecutionError, LocalNotification, UsageError,
        split_command_line,
    },
};
use rstest::rstest;

async fn run_line(
    host: &FortuneHost,
    conversation: &InMemoryConversation,
    line: &str,
) -> DispatchOutcome {
    let (name, tail) = split_command_line(line).expect("line is a command");
    host.dispatcher
        .dispatch(name, tail, conversation)
        .await
        .expect("command is registered")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fortune_lines_reach_a_direct_message() {
    let host = FortuneHost::scripted(ScriptedGenerator::lines([
        "You will write Rust.",
        "It will compile.",
    ]));
    let conversation = InMemoryConversation::direct("alice");

    let outcome = run_line(&host, &conversation, "/fortune cookie").await;

    assert_eq!(outcome, DispatchOutcome::Delivered { lines: 2 });
    assert_eq!(
        conversation.texts(),
        ["You will write Rust.", "It will compile."]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fortune_lines_reach_a_group_chat() {
    let host = FortuneHost::scripted(ScriptedGenerator::lines(["shared"]));
    let conversation = InMemoryConversation::group("rustaceans");

    let outcome = run_line(&host, &conversation, "/fortune cookie").await;

    assert_eq!(outcome, DispatchOutcome::Delivered { lines: 1 });
    let sent = conversation.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent.iter().all(|message| message.channel == DeliveryChannel::Group));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_fortune_shows_a_local_notice() {
    let host = FortuneHost::without_fortune();
    let conversation = InMemoryConversation::direct("alice");

    let outcome = run_line(&host, &conversation, "/fortune cookie").await;

    assert!(matches!(outcome, DispatchOutcome::NotifyShown { .. }));
    assert!(conversation.sent().is_empty());
    assert_eq!(
        host.notifier.shown(),
        [LocalNotification::new(
            "Fortune Notification",
            "fortune command not available",
            "cookie",
        )]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fortune_in_an_unsupported_conversation_delivers_nothing() {
    let host = FortuneHost::scripted(ScriptedGenerator::lines(["x", "y"]));
    let conversation = InMemoryConversation::new("debug window", ConversationKind::Other);

    let outcome = run_line(&host, &conversation, "/fortune cookie").await;

    assert!(matches!(
        outcome,
        DispatchOutcome::ExecutionError(ExecutionError::UnsupportedConversationType {
            delivered: 0,
            ..
        })
    ));
    assert!(conversation.sent().is_empty());
    assert!(host.notifier.shown().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn log_message_goes_to_the_diagnostic_log() {
    let host = FortuneHost::without_fortune();
    let conversation = InMemoryConversation::direct("alice");

    let outcome = run_line(&host, &conversation, "/log remember   the milk").await;

    assert_eq!(outcome, DispatchOutcome::Delivered { lines: 0 });
    let entries = host.log.entries();
    assert_eq!(entries.len(), 1);
    let entry = entries.first().expect("one entry");
    assert_eq!(entry.source, "fortune");
    assert_eq!(entry.message, "remember   the milk");
    assert!(conversation.sent().is_empty());
}

#[rstest]
#[case("/fortune")]
#[case("/fortune two words")]
#[tokio::test(flavor = "multi_thread")]
async fn fortune_requires_exactly_one_word(#[case] line: &str) {
    let host = FortuneHost::scripted(ScriptedGenerator::lines(["unused"]));
    let conversation = InMemoryConversation::direct("alice");

    let outcome = run_line(&host, &conversation, line).await;

    assert!(matches!(
        outcome,
        DispatchOutcome::UsageError(UsageError::ArgumentMismatch { ref help, .. })
            if help.starts_with("fortune <word>")
    ));
    assert!(host.generator.launches().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_dispatches_are_independent() {
    let host = FortuneHost::scripted(ScriptedGenerator::lines(["again"]));
    let conversation = InMemoryConversation::direct("alice");

    for _ in 0..3 {
        let outcome = run_line(&host, &conversation, "/fortune cookie").await;
        assert_eq!(outcome, DispatchOutcome::Delivered { lines: 1 });
    }

    assert_eq!(conversation.texts(), ["again", "again", "again"]);
    assert_eq!(host.generator.launches().len(), 3);
    assert_eq!(host.generator.closed_count(), 3);
}
