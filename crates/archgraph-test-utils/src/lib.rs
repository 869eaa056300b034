//! Utilities shared by archgraph tests.
//!
//! [`fixtures`] holds class records for a handful of JDK classes and for generic classes covering
//! the signature shapes the importer has to handle. [`matchers`] describes expected type
//! parameter bounds.

pub mod fixtures;
pub mod matchers;

pub use matchers::{
    array_of, assert_bounds, assert_type_parameters, class, describe_usage, parameterized,
    type_variable, wildcard, wildcard_extends, wildcard_super, BoundMatcher,
};

/// Installs debug-level logging for tests. Output goes through the test harness capture.
pub fn init_test_tracing() {
    archgraph_config::init_tracing(&archgraph_config::LoggingConfig {
        level: "archgraph=debug".to_string(),
        ..Default::default()
    });
    tracing::trace!(target: "archgraph.test", "test tracing installed");
}
