//! Unit tests for the console host.

use super::{
    ConsoleConversation, ConsoleDispatcher, ConsoleNotifier, handle_line, print_lines,
};
use chatcmd::command::{
    adapters::{ProcessGeneratorInvoker, TracingDiagnosticLog, memory::InMemoryCommandRegistry},
    domain::LocalNotification,
    ports::{Conversation, Notifier, NotifierError},
    services::CommandDispatcher,
};
use rstest::rstest;
use std::sync::Arc;
use tokio::sync::mpsc;

fn console() -> (ConsoleNotifier, mpsc::UnboundedReceiver<String>) {
    let (stderr, pending) = mpsc::unbounded_channel();
    (ConsoleNotifier { stderr }, pending)
}

fn dispatcher(notifier: &ConsoleNotifier) -> ConsoleDispatcher {
    CommandDispatcher::new(
        Arc::new(InMemoryCommandRegistry::new()),
        Arc::new(ProcessGeneratorInvoker::new()),
        Arc::new(notifier.clone()),
        Arc::new(TracingDiagnosticLog::new()),
    )
}

async fn printed(pending: mpsc::UnboundedReceiver<String>) -> String {
    let mut out = Vec::new();
    print_lines(pending, &mut out).await.expect("buffer accepts output");
    String::from_utf8(out).expect("output is UTF-8")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conversation_writes_each_line_asynchronously() {
    let conversation = ConsoleConversation::new(Vec::<u8>::new());

    conversation.send_direct("hello").await.expect("direct send");
    conversation.send_group("everyone").await.expect("group send");

    assert_eq!(conversation.into_inner(), b"hello\n[group] everyone\n");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notices_and_hints_are_printed_in_order() {
    let (notifier, pending) = console();

    notifier
        .notify(&LocalNotification::new(
            "Fortune Notification",
            "fortune command not available",
            "cookie",
        ))
        .expect("notice queued");
    notifier.hint("try /help").expect("hint queued");
    drop(notifier);

    assert_eq!(
        printed(pending).await,
        "[Fortune Notification] fortune command not available (cookie)\ntry /help\n"
    );
}

#[rstest]
fn notices_fail_once_the_printer_is_gone() {
    let (notifier, pending) = console();
    drop(pending);

    let result = notifier.notify(&LocalNotification::new("title", "body", ""));

    assert!(matches!(result, Err(NotifierError::Unavailable(_))));
}

#[rstest]
#[case("/nope", "unknown command '/nope'; try /help\n")]
#[case("just chatting", "not a command; commands start with '/'\n")]
#[case("   ", "")]
#[tokio::test(flavor = "multi_thread")]
async fn unhandled_input_produces_a_hint(#[case] line: &str, #[case] expected: &str) {
    let (notifier, pending) = console();
    let host = dispatcher(&notifier);
    let conversation = ConsoleConversation::new(Vec::<u8>::new());

    handle_line(&host, &conversation, &notifier, line)
        .await
        .expect("line is handled");
    drop(host);
    drop(notifier);

    assert_eq!(printed(pending).await, expected);
    assert!(conversation.into_inner().is_empty());
}
