//! # crudkit-data-sqlx — SQLx backend for the crudkit data layer
//!
//! This crate runs the statements rendered by [`crudkit-data`] through
//! [SQLx](https://github.com/launchbadge/sqlx). It adds the repository
//! itself, per-driver binding, transaction helpers and error bridging.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxRepository`] | Generic CRUD repository over a borrowed `DB::Connection` |
//! | [`Backend`] | Dialect, argument binding and insert ids of one driver |
//! | [`Tx`] | Transaction wrapper handing out repositories; rollback on drop |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` (`.into_data_error()`) |
//! | [`DataErrorExt`] | `is_constraint_violation()` on a `DataError` |
//! | [`SqlxResult<T>`] | Type alias for `Result<T, DataError>` |
//!
//! # Feature flags
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` |
//! | `postgres` | PostgreSQL via `sqlx/postgres` |
//! | `mysql`    | MySQL via `sqlx/mysql` |
//!
//! # Quick start
//!
//! ```toml
//! [dependencies]
//! crudkit-data-sqlx = { version = "0.1", features = ["sqlite"] }
//! ```
//!
//! ```ignore
//! use crudkit_data::prelude::*;
//! use crudkit_data_sqlx::SqlxRepository;
//! use sqlx::Sqlite;
//!
//! let mut conn = pool.acquire().await?;
//! let mut users = SqlxRepository::<User, Sqlite>::new(&mut *conn);
//!
//! let ann = users.create(&fields! { "name" => "Ann", "age" => 30 }).await?;
//! let adults = users
//!     .list(&ListQuery::new().filter(Filter::ge("age", 18)).order_by("name", true))
//!     .await?;
//! users.delete(&ann.id).await?;
//! ```
//!
//! # Error bridging
//!
//! Due to Rust's orphan rules, `From<sqlx::Error> for DataError` can't be
//! implemented here. Use the [`SqlxErrorExt`] trait instead:
//!
//! ```ignore
//! use crudkit_data_sqlx::SqlxErrorExt;
//!
//! let user = sqlx::query_as("SELECT ...")
//!     .fetch_one(&pool)
//!     .await
//!     .map_err(|e| e.into_data_error())?;
//! ```

pub mod backend;
pub mod error;
pub mod repository;
pub mod tx;

pub use backend::Backend;
pub use error::{DataErrorExt, SqlxErrorExt, SqlxResult};
pub use repository::SqlxRepository;
pub use tx::Tx;

/// Re-exports of the most commonly used types from both `crudkit-data` and this crate.
pub mod prelude {
    pub use crate::{Backend, DataErrorExt, SqlxErrorExt, SqlxRepository, Tx};
    pub use crudkit_data::prelude::*;
}
