use crudkit_data::DataError;
use sqlx::error::ErrorKind;

/// Extension trait for converting `sqlx::Error` into `DataError`.
///
/// Due to Rust's orphan rules, we can't implement `From<sqlx::Error> for DataError`
/// in this crate. Instead, use `.into_data_error()` or `map_err(SqlxErrorExt::into_data_error)`.
pub trait SqlxErrorExt {
    fn into_data_error(self) -> DataError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_data_error(self) -> DataError {
        match &self {
            sqlx::Error::RowNotFound => DataError::NotFound("Row not found".into()),
            _ => DataError::database(self),
        }
    }
}

/// Inspection of the driver error carried by a [`DataError`].
pub trait DataErrorExt {
    /// Whether the database rejected the statement for breaking a unique,
    /// foreign-key, not-null or check constraint.
    fn is_constraint_violation(&self) -> bool;
}

impl DataErrorExt for DataError {
    fn is_constraint_violation(&self) -> bool {
        let DataError::Database(source) = self else {
            return false;
        };
        source
            .downcast_ref::<sqlx::Error>()
            .and_then(sqlx::Error::as_database_error)
            .is_some_and(|db| {
                matches!(
                    db.kind(),
                    ErrorKind::UniqueViolation
                        | ErrorKind::ForeignKeyViolation
                        | ErrorKind::NotNullViolation
                        | ErrorKind::CheckViolation
                )
            })
    }
}

/// Convenience alias for data-layer results using `DataError`.
pub type SqlxResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(sqlx::Error::RowNotFound.into_data_error().is_not_found());
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = sqlx::Error::PoolTimedOut.into_data_error();
        assert!(matches!(err, DataError::Database(_)));
        assert!(!err.is_constraint_violation());
        assert!(!DataError::Validation("x".into()).is_constraint_violation());
    }
}
