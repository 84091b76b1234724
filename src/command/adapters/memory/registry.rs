//! In-memory command registry adapter.

use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::command::{
    domain::{CommandDescriptor, CommandName, RegisteredCommand, RegistrationId},
    ports::{CommandRegistry, CommandRegistryError, CommandRegistryResult},
};

/// Thread-safe in-memory command table.
///
/// Lookups take a shared read lock; registration and removal take the
/// write lock. Clones share the same table.
#[derive(Debug)]
pub struct InMemoryCommandRegistry<C = DefaultClock> {
    state: Arc<RwLock<InMemoryRegistryState>>,
    clock: C,
}

#[derive(Debug, Default)]
struct InMemoryRegistryState {
    commands: HashMap<RegistrationId, RegisteredCommand>,
    name_index: HashMap<CommandName, RegistrationId>,
}

impl InMemoryCommandRegistry<DefaultClock> {
    /// Creates an empty registry using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(DefaultClock)
    }
}

// `DefaultClock` is a unit struct without a `Clone` impl, so the derive's
// `C: Clone` bound cannot be met; clone the shared table by hand.
impl Clone for InMemoryCommandRegistry<DefaultClock> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: DefaultClock,
        }
    }
}

impl Default for InMemoryCommandRegistry<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryCommandRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty registry stamping registrations with `clock`.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryRegistryState::default())),
            clock,
        }
    }
}

fn poisoned(err: impl std::fmt::Display) -> CommandRegistryError {
    CommandRegistryError::Unavailable(err.to_string())
}

impl<C> CommandRegistry for InMemoryCommandRegistry<C>
where
    C: Clock + Send + Sync,
{
    fn register(&self, descriptor: CommandDescriptor) -> CommandRegistryResult<RegistrationId> {
        descriptor.validate()?;
        let registered = RegisteredCommand::new(descriptor, &self.clock);
        let id = registered.id();
        let name = registered.descriptor().name().clone();

        let mut state = self.state.write().map_err(poisoned)?;
        if state.name_index.contains_key(&name) {
            return Err(CommandRegistryError::DuplicateName(name));
        }
        state.name_index.insert(name.clone(), id);
        state.commands.insert(id, registered);
        drop(state);

        debug!(command = %name, %id, "command registered");
        Ok(id)
    }

    fn unregister(&self, id: RegistrationId) -> CommandRegistryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let removed = state
            .commands
            .remove(&id)
            .ok_or(CommandRegistryError::UnknownId(id))?;
        state.name_index.remove(removed.descriptor().name());
        drop(state);

        debug!(command = %removed.descriptor().name(), %id, "command unregistered");
        Ok(())
    }

    fn find_by_name(&self, name: &str) -> CommandRegistryResult<Option<RegisteredCommand>> {
        let Ok(command_name) = CommandName::new(name) else {
            return Ok(None);
        };
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .name_index
            .get(&command_name)
            .and_then(|id| state.commands.get(id))
            .cloned())
    }

    fn list(&self) -> CommandRegistryResult<Vec<RegisteredCommand>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut commands: Vec<_> = state.commands.values().cloned().collect();
        drop(state);
        commands.sort_by(|left, right| {
            right
                .descriptor()
                .priority()
                .cmp(&left.descriptor().priority())
                .then_with(|| left.descriptor().name().cmp(right.descriptor().name()))
        });
        Ok(commands)
    }

    fn is_empty(&self) -> CommandRegistryResult<bool> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.commands.is_empty())
    }

    fn len(&self) -> CommandRegistryResult<usize> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.commands.len())
    }
}
