//! crudkit — generic CRUD repositories for `sqlx`.
//!
//! This facade crate re-exports the crudkit sub-crates through a single
//! dependency with feature flags. Import everything you need with:
//!
//! ```ignore
//! use crudkit::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature     | Default | Crate                          |
//! |-------------|---------|--------------------------------|
//! | `data-sqlx` | **yes** | `crudkit-data-sqlx`            |
//! | `sqlite`    | no      | `crudkit-data-sqlx/sqlite`     |
//! | `postgres`  | no      | `crudkit-data-sqlx/postgres`   |
//! | `mysql`     | no      | `crudkit-data-sqlx/mysql`      |
//! | `full`      | no      | All of the above               |
//!
//! `crudkit-core` (configuration, tracing) and `crudkit-data` (entities,
//! filters, rendering) are always available.

pub use crudkit_core;
pub use crudkit_data;

#[cfg(feature = "data-sqlx")]
pub use crudkit_data_sqlx;

pub use crudkit_core::{init_tracing, ConfigError, CrudConfig};
pub use crudkit_data::fields;

/// Unified prelude — import everything with `use crudkit::prelude::*`.
pub mod prelude {
    pub use crudkit_core::prelude::*;
    pub use crudkit_data::prelude::*;
    pub use crudkit_data::RepositoryConfig;

    #[cfg(feature = "data-sqlx")]
    pub use crudkit_data_sqlx::prelude::*;
}
