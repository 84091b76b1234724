//! Plugin load and unload against a shared registry.

use crate::in_memory::helpers::FortuneHost;
use chatcmd::command::{
    adapters::memory::{InMemoryConversation, ScriptedGenerator},
    domain::DispatchOutcome,
    ports::CommandRegistry,
    services::DispatchError,
};
use chatcmd::plugin::{FortunePlugin, FortunePluginConfig};
use rstest::rstest;

#[rstest]
fn help_is_available_for_plugin_commands() {
    let host = FortuneHost::without_fortune();

    let help = host
        .registry
        .help("/fortune")
        .expect("lookup succeeds")
        .expect("fortune is registered");

    assert_eq!(
        help,
        "fortune <word>: Pops up a fortune with the word you enter."
    );
}

#[rstest]
fn listing_puts_fortune_first() {
    let host = FortuneHost::without_fortune();

    let names: Vec<String> = host
        .registry
        .list()
        .expect("listing succeeds")
        .iter()
        .map(|command| command.descriptor().name().to_string())
        .collect();

    assert_eq!(names, ["fortune", "log"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unloaded_commands_are_unknown() {
    let mut host = FortuneHost::scripted(ScriptedGenerator::lines(["x"]));
    host.unload();
    let conversation = InMemoryConversation::direct("alice");

    let result = host.dispatcher.dispatch("fortune", "cookie", &conversation).await;

    assert_eq!(
        result,
        Err(DispatchError::UnknownCommand("fortune".to_owned()))
    );
    assert!(host.registry.is_empty().expect("registry readable"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reloading_restores_dispatch() {
    let mut host = FortuneHost::scripted(ScriptedGenerator::lines(["back"]));
    host.unload();
    host.loaded = Some(
        FortunePlugin::new(FortunePluginConfig::default())
            .load(host.registry.as_ref())
            .expect("plugin reloads"),
    );
    let conversation = InMemoryConversation::direct("alice");

    let outcome = host
        .dispatcher
        .dispatch("fortune", "cookie", &conversation)
        .await
        .expect("command is registered");

    assert_eq!(outcome, DispatchOutcome::Delivered { lines: 1 });
}

#[rstest]
fn second_load_into_the_same_registry_fails_cleanly() {
    let host = FortuneHost::without_fortune();

    let result = FortunePlugin::new(FortunePluginConfig::default()).load(host.registry.as_ref());

    assert!(result.is_err());
    assert_eq!(host.registry.list().expect("listing succeeds").len(), 2);
}
