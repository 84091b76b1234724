//! Application services for command delivery and dispatch.

mod config;
mod delivery;
mod dispatcher;

pub use config::{ConfigError, DispatcherConfig, GENERATOR_TIMEOUT_ENV, TERMINATION_GRACE_ENV};
pub use delivery::{DeliveryError, DeliveryRouter};
pub use dispatcher::{CommandDispatcher, DispatchError};
