use std::fmt::Display;

use crate::error::DataError;
use crate::value::Value;

/// Trait representing a database entity with a table name, id column, and column list.
///
/// # Example
///
/// ```ignore
/// impl Entity for User {
///     type Id = i64;
///     fn table_name() -> &'static str { "users" }
///     fn id_column() -> &'static str { "id" }
///     fn columns() -> &'static [&'static str] { &["id", "name", "age"] }
///     fn id(&self) -> &i64 { &self.id }
/// }
/// ```
pub trait Entity: Send + Sync + Unpin + 'static {
    type Id: Clone + Display + Into<Value> + Send + Sync + 'static;

    fn table_name() -> &'static str;
    fn id_column() -> &'static str;
    fn columns() -> &'static [&'static str];
    fn id(&self) -> &Self::Id;

    /// Whether the database assigns the primary key on insert.
    ///
    /// When `true`, a key supplied to `create` is dropped.
    fn id_is_generated() -> bool {
        true
    }

    /// Column set to `CURRENT_TIMESTAMP` on every update, if any.
    fn touch_column() -> Option<&'static str> {
        None
    }

    fn has_column(name: &str) -> bool {
        Self::columns().contains(&name)
    }
}

/// Reject `name` unless it is a column of `T`.
pub fn check_column<T: Entity>(name: &str) -> Result<(), DataError> {
    if T::has_column(name) {
        Ok(())
    } else {
        Err(DataError::unknown_field(T::table_name(), name))
    }
}

/// Reject the first name in `names` that is not a column of `T`.
pub fn check_columns<'a, T: Entity>(names: impl IntoIterator<Item = &'a str>) -> Result<(), DataError> {
    names.into_iter().try_for_each(check_column::<T>)
}
