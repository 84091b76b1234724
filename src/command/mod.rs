//! Command registration, argument parsing and dispatch.
//!
//! This module owns the command table of a chat client and routes each
//! invocation to its handler: a diagnostic log write, or an external
//! generator program whose output lines are delivered into the active
//! conversation. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
