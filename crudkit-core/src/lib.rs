//! # crudkit-core
//!
//! Shared runtime pieces for the crudkit crates: layered configuration
//! ([`CrudConfig`]) and tracing setup ([`init_tracing`]).

pub mod config;
mod tracing_setup;

pub use config::{ConfigError, ConfigProperties, ConfigValue, CrudConfig, FromConfigValue};
pub use tracing_setup::{init_tracing, init_tracing_with, DEFAULT_FILTER};

pub mod prelude {
    //! Re-exports of the most commonly used core types.
    pub use crate::{ConfigProperties, CrudConfig};
}
