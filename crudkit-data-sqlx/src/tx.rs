//! Transaction wrapper scoping a unit of work.

use std::ops::{Deref, DerefMut};

use crudkit_data::{DataError, Entity, RepositoryConfig};
use sqlx::{Database, Pool, Transaction};

use crate::backend::Backend;
use crate::error::SqlxErrorExt;
use crate::repository::SqlxRepository;

/// A wrapper around SQLx [`Transaction`] that hands out repositories.
///
/// The transaction is committed only by [`Tx::commit`]; dropping it (an
/// early `?` return, a panic) rolls everything back.
///
/// # Example
///
/// ```ignore
/// let mut tx = Tx::begin(&pool).await?;
/// let user = tx.repository::<User>().create(&fields! { "name" => "Ann" }).await?;
/// tx.repository::<AuditLog>().create(&fields! { "user_id" => user.id }).await?;
/// tx.commit().await?;
/// ```
pub struct Tx<'a, DB: Database>(pub Transaction<'a, DB>);

impl<'a, DB: Database> Deref for Tx<'a, DB> {
    type Target = Transaction<'a, DB>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, DB: Database> DerefMut for Tx<'a, DB> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<DB: Database> Tx<'static, DB> {
    /// Begin a transaction on a connection taken from `pool`.
    pub async fn begin(pool: &Pool<DB>) -> Result<Self, DataError> {
        let tx = pool.begin().await.map_err(SqlxErrorExt::into_data_error)?;
        tracing::debug!("Transaction started");
        Ok(Tx(tx))
    }
}

impl<'a, DB: Database> Tx<'a, DB> {
    pub async fn commit(self) -> Result<(), DataError> {
        self.0.commit().await.map_err(SqlxErrorExt::into_data_error)?;
        tracing::debug!("Transaction committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), DataError> {
        self.0.rollback().await.map_err(SqlxErrorExt::into_data_error)?;
        tracing::debug!("Transaction rolled back");
        Ok(())
    }

    /// Unwraps the `Tx` into the inner `Transaction`.
    pub fn into_inner(self) -> Transaction<'a, DB> {
        self.0
    }

    /// Returns a mutable reference to the underlying connection.
    pub fn as_mut(&mut self) -> &mut <DB as Database>::Connection {
        &mut *self.0
    }

    /// A repository for `T` running inside this transaction.
    pub fn repository<T: Entity>(&mut self) -> SqlxRepository<'_, T, DB>
    where
        DB: Backend,
    {
        SqlxRepository::new(self.as_mut())
    }

    pub fn repository_with<T: Entity>(&mut self, config: RepositoryConfig) -> SqlxRepository<'_, T, DB>
    where
        DB: Backend,
    {
        SqlxRepository::with_config(self.as_mut(), config)
    }
}
