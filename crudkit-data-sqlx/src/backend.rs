//! Per-driver glue: the SQL dialect, argument binding and insert ids.

use crudkit_data::{DataError, Dialect, Value};
use sqlx::Database;
#[cfg(any(feature = "sqlite", feature = "postgres", feature = "mysql"))]
use sqlx::{Arguments, Encode, Type};

/// A `sqlx` driver the repository can run on.
///
/// Implemented for `Sqlite`, `Postgres` and `MySql` behind the matching
/// cargo features.
pub trait Backend: Database {
    const DIALECT: Dialect;

    /// Bind statement values, in placeholder order.
    fn arguments<'q>(params: Vec<Value>) -> Result<<Self as Database>::Arguments<'q>, DataError>;

    /// Key generated by the last `INSERT`, when the driver reports one.
    fn last_insert_id(result: &<Self as Database>::QueryResult) -> Option<i64>;
}

#[cfg(any(feature = "sqlite", feature = "postgres", feature = "mysql"))]
fn bind_all<'q, DB>(params: Vec<Value>) -> Result<<DB as Database>::Arguments<'q>, DataError>
where
    DB: Database,
    bool: Encode<'q, DB> + Type<DB>,
    i64: Encode<'q, DB> + Type<DB>,
    f64: Encode<'q, DB> + Type<DB>,
    String: Encode<'q, DB> + Type<DB>,
    Vec<u8>: Encode<'q, DB> + Type<DB>,
    Option<i64>: Encode<'q, DB> + Type<DB>,
{
    let mut args: <DB as Database>::Arguments<'q> = Default::default();
    args.reserve(params.len(), 0);
    for value in params {
        let bound = match value {
            // Statements write NULL literally; kept for hand-built parameter lists
            Value::Null => args.add(None::<i64>),
            Value::Bool(b) => args.add(b),
            Value::Int(i) => args.add(i),
            Value::Float(x) => args.add(x),
            Value::Text(s) => args.add(s),
            Value::Bytes(b) => args.add(b),
        };
        bound.map_err(DataError::Database)?;
    }
    Ok(args)
}

#[cfg(feature = "sqlite")]
impl Backend for sqlx::Sqlite {
    const DIALECT: Dialect = Dialect::Sqlite;

    fn arguments<'q>(params: Vec<Value>) -> Result<<Self as Database>::Arguments<'q>, DataError> {
        bind_all::<Self>(params)
    }

    fn last_insert_id(result: &sqlx::sqlite::SqliteQueryResult) -> Option<i64> {
        Some(result.last_insert_rowid())
    }
}

#[cfg(feature = "postgres")]
impl Backend for sqlx::Postgres {
    const DIALECT: Dialect = Dialect::Postgres;

    fn arguments<'q>(params: Vec<Value>) -> Result<<Self as Database>::Arguments<'q>, DataError> {
        bind_all::<Self>(params)
    }

    // Inserts read keys back through RETURNING
    fn last_insert_id(_result: &sqlx::postgres::PgQueryResult) -> Option<i64> {
        None
    }
}

#[cfg(feature = "mysql")]
impl Backend for sqlx::MySql {
    const DIALECT: Dialect = Dialect::MySql;

    fn arguments<'q>(params: Vec<Value>) -> Result<<Self as Database>::Arguments<'q>, DataError> {
        bind_all::<Self>(params)
    }

    fn last_insert_id(result: &sqlx::mysql::MySqlQueryResult) -> Option<i64> {
        i64::try_from(result.last_insert_id()).ok()
    }
}
