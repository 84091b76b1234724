//! In-memory dispatch integration tests.
//!
//! Tests are organized into modules by functionality:
//! - `dispatch_flow_tests`: delivery, notices and usage errors through the fortune plugin
//! - `plugin_lifecycle_tests`: help, listing, load and unload

mod in_memory {
    pub mod helpers;

    mod dispatch_flow_tests;
    mod plugin_lifecycle_tests;
}
