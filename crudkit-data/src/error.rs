/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    /// No row exists for the requested primary key.
    NotFound(String),
    /// The input named a field the entity does not have, or was malformed.
    Validation(String),
    /// Failure reported by the database driver, passed through untouched.
    Database(Box<dyn std::error::Error + Send + Sync>),
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates (e.g. `crudkit-data-sqlx`) to wrap
    /// driver-specific errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }

    pub(crate) fn unknown_field(table: &str, field: &str) -> Self {
        DataError::Validation(format!("'{field}' is not a column of '{table}'"))
    }

    /// `NotFound` naming the table and the missing key.
    pub fn not_found(table: &str, id: impl std::fmt::Display) -> Self {
        DataError::NotFound(format!("'{table}' with id '{id}'"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DataError::Validation(_))
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NotFound(msg) => write!(f, "Not found: {msg}"),
            DataError::Validation(msg) => write!(f, "Validation error: {msg}"),
            DataError::Database(err) => write!(f, "Database error: {err}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Database(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<crate::query::QueryError> for DataError {
    fn from(err: crate::query::QueryError) -> Self {
        DataError::Validation(err.to_string())
    }
}
