//! Unit tests for the command module.
//!
//! Tests are organised by layer: domain values and the argument parser,
//! the in-memory registry, delivery routing, dispatch orchestration and the
//! child-process generator.

mod domain_tests;
