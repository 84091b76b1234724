//! Chatcmd: command dispatch for chat clients.
//!
//! This crate registers named slash commands, parses their arguments and
//! routes each invocation either to a diagnostic log or to an external
//! generator program whose output lines are delivered into the active
//! conversation.
//!
//! # Architecture
//!
//! Chatcmd follows hexagonal architecture principles:
//!
//! - **Domain**: Pure command types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the host and for processes
//! - **Adapters**: Concrete implementations of ports (memory, processes,
//!   tracing)
//!
//! # Modules
//!
//! - [`command`]: Command registry, argument parsing and dispatch
//! - [`plugin`]: Plugins contributing commands, including `/fortune`
//! - [`telemetry`]: Tracing subscriber setup

pub mod command;
pub mod plugin;
pub mod telemetry;
