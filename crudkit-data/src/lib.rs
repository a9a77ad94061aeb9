//! # crudkit-data
//!
//! Backend-neutral pieces of the crudkit data layer: the [`Entity`]
//! descriptor, dynamic [`Value`]s and [`Fields`], filters and sorting,
//! pagination, SQL rendering ([`QueryBuilder`], [`Statements`]) and the
//! [`Repository`] trait implemented by backend crates such as
//! `crudkit-data-sqlx`.

pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod page;
pub mod query;
pub mod repository;
pub mod statements;
pub mod value;

pub use config::RepositoryConfig;
pub use entity::Entity;
pub use error::DataError;
pub use filter::{Direction, Filter, ListQuery, Sort};
pub use page::{Page, Pageable};
pub use query::{Dialect, IdentifierPolicy, QueryBuilder, QueryError};
pub use repository::Repository;
pub use statements::{Statement, Statements};
pub use value::{Fields, Value};

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::fields;
    pub use crate::{
        DataError, Entity, Fields, Filter, ListQuery, Page, Pageable, Repository, Sort, Value,
    };
}
