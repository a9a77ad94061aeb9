//! Test utilities for crudkit: a throwaway in-memory SQLite database,
//! fixture entities and a tracing subscriber that writes through the test
//! harness.

mod db;
pub mod fixtures;

pub use db::TestDb;

use tracing_subscriber::EnvFilter;

/// Install a tracing subscriber captured by `cargo test`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(crudkit_core::DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
