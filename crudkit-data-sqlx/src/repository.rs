use async_stream::try_stream;
use crudkit_data::{
    DataError, Entity, Fields, Filter, ListQuery, Page, Pageable, Repository, RepositoryConfig,
    Statement, Statements, Value,
};
use futures_util::{Stream, TryStreamExt};
use sqlx::{Database, Executor, FromRow, IntoArguments};

use crate::backend::Backend;
use crate::error::SqlxErrorExt;

/// A generic SQL repository bound to one entity type and one connection.
///
/// The connection is borrowed for the repository's lifetime; pass a pooled
/// connection (`&mut *conn`) or a transaction (`&mut *tx`) so the caller
/// keeps control of the unit of work.
///
/// # Example
///
/// ```ignore
/// let mut conn = pool.acquire().await?;
/// let mut users = SqlxRepository::<User, Sqlite>::new(&mut *conn);
/// let ann = users.create(&fields! { "name" => "Ann", "age" => 30 }).await?;
/// ```
pub struct SqlxRepository<'c, T, DB: Database> {
    conn: &'c mut DB::Connection,
    statements: Statements<T>,
}

impl<'c, T, DB> SqlxRepository<'c, T, DB>
where
    T: Entity,
    DB: Backend,
{
    pub fn new(conn: &'c mut DB::Connection) -> Self {
        Self::with_config(conn, RepositoryConfig::default())
    }

    pub fn with_config(conn: &'c mut DB::Connection, config: RepositoryConfig) -> Self {
        Self {
            conn,
            statements: Statements::with_config(DB::DIALECT, config),
        }
    }

    pub fn statements(&self) -> &Statements<T> {
        &self.statements
    }

    /// The borrowed connection, for statements this repository does not cover.
    pub fn connection(&mut self) -> &mut DB::Connection {
        &mut *self.conn
    }
}

impl<'c, T, DB> SqlxRepository<'c, T, DB>
where
    T: Entity + for<'r> FromRow<'r, DB::Row>,
    DB: Backend,
    for<'e> &'e mut DB::Connection: Executor<'e, Database = DB>,
    for<'q> <DB as Database>::Arguments<'q>: IntoArguments<'q, DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
{
    /// Lazily stream the rows matched by `query`, decoding each as it arrives.
    ///
    /// Validation errors surface as the first item.
    pub fn stream<'a>(
        &'a mut self,
        query: &ListQuery,
    ) -> impl Stream<Item = Result<T, DataError>> + 'a {
        let statement = self.statements.select(query);
        let conn = &mut *self.conn;
        try_stream! {
            let statement = statement?;
            log_statement(&statement);
            let args = DB::arguments(statement.params)?;
            let mut rows = sqlx::query_as_with::<DB, T, _>(&statement.sql, args).fetch(conn);
            while let Some(row) = rows.try_next().await.map_err(SqlxErrorExt::into_data_error)? {
                yield row;
            }
        }
    }

    async fn fetch_optional(&mut self, statement: Statement) -> Result<Option<T>, DataError> {
        log_statement(&statement);
        let args = DB::arguments(statement.params)?;
        sqlx::query_as_with::<DB, T, _>(&statement.sql, args)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn fetch_all(&mut self, statement: Statement) -> Result<Vec<T>, DataError> {
        log_statement(&statement);
        let args = DB::arguments(statement.params)?;
        sqlx::query_as_with::<DB, T, _>(&statement.sql, args)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn execute(&mut self, statement: Statement) -> Result<DB::QueryResult, DataError> {
        log_statement(&statement);
        let args = DB::arguments(statement.params)?;
        sqlx::query_with::<DB, _>(&statement.sql, args)
            .execute(&mut *self.conn)
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn load(&mut self, id: &T::Id, lock: bool) -> Result<T, DataError> {
        let statement = self.statements.select_by_id(id, lock)?;
        self.fetch_optional(statement)
            .await?
            .ok_or_else(|| DataError::not_found(T::table_name(), id))
    }

    /// Run a rendered INSERT and return the stored row.
    async fn insert(&mut self, statement: Statement, fields: &Fields) -> Result<T, DataError> {
        if DB::DIALECT.supports_returning() {
            return self
                .fetch_optional(statement)
                .await?
                .ok_or_else(|| DataError::Database("INSERT returned no row".into()));
        }

        let result = self.execute(statement).await?;
        let key = if T::id_is_generated() {
            DB::last_insert_id(&result).map(Value::Int)
        } else {
            fields.get(T::id_column()).cloned()
        };
        let key = key.ok_or_else(|| {
            DataError::Database(format!("no key for the row inserted into '{}'", T::table_name()).into())
        })?;

        let lookup = self.statements.select_by_key(key.clone(), false)?;
        self.fetch_optional(lookup)
            .await?
            .ok_or_else(|| DataError::not_found(T::table_name(), key))
    }

    async fn create_inner(&mut self, fields: &Fields) -> Result<T, DataError> {
        let statement = self.statements.insert(fields)?;
        self.insert(statement, fields).await
    }

    async fn create_many_inner(&mut self, batch: &[Fields]) -> Result<Vec<T>, DataError> {
        let statements = batch
            .iter()
            .map(|fields| self.statements.insert(fields))
            .collect::<Result<Vec<_>, _>>()?;

        let mut created = Vec::with_capacity(batch.len());
        for (statement, fields) in statements.into_iter().zip(batch) {
            created.push(self.insert(statement, fields).await?);
        }
        Ok(created)
    }

    async fn find_inner(&mut self, id: &T::Id) -> Result<Option<T>, DataError> {
        let statement = self.statements.select_by_id(id, false)?;
        self.fetch_optional(statement).await
    }

    async fn list_inner(&mut self, query: &ListQuery) -> Result<Vec<T>, DataError> {
        let statement = self.statements.select(query)?;
        self.fetch_all(statement).await
    }

    async fn count_inner(&mut self, filters: &[Filter]) -> Result<u64, DataError> {
        let statement = self.statements.count(filters)?;
        log_statement(&statement);
        let args = DB::arguments(statement.params)?;
        let count = sqlx::query_scalar_with::<DB, i64, _>(&statement.sql, args)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        u64::try_from(count).map_err(DataError::database)
    }

    async fn page_inner(
        &mut self,
        pageable: &Pageable,
        filters: &[Filter],
    ) -> Result<Page<T>, DataError> {
        let total = self.count_inner(filters).await?;
        let query = ListQuery::from_pageable(pageable).filters(filters.iter().cloned());
        let statement = self.statements.select(&query)?;
        let content = self.fetch_all(statement).await?;
        Ok(Page::new(content, pageable, total))
    }

    async fn update_inner(&mut self, id: &T::Id, fields: &Fields) -> Result<T, DataError> {
        let statement = self.statements.update(id, fields)?;
        let current = self.load(id, true).await?;
        match statement {
            Some(statement) => {
                self.execute(statement).await?;
                self.load(id, false).await
            }
            None => Ok(current),
        }
    }

    async fn delete_inner(&mut self, id: &T::Id) -> Result<T, DataError> {
        let statement = self.statements.delete(id)?;
        let current = self.load(id, false).await?;
        self.execute(statement).await?;
        Ok(current)
    }
}

impl<'c, T, DB> Repository<T> for SqlxRepository<'c, T, DB>
where
    T: Entity + for<'r> FromRow<'r, DB::Row>,
    DB: Backend,
    for<'e> &'e mut DB::Connection: Executor<'e, Database = DB>,
    for<'q> <DB as Database>::Arguments<'q>: IntoArguments<'q, DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
{
    async fn create(&mut self, fields: &Fields) -> Result<T, DataError> {
        let result = self.create_inner(fields).await;
        traced::<T, _>("CREATE", None, result)
    }

    async fn create_many(&mut self, batch: &[Fields]) -> Result<Vec<T>, DataError> {
        let result = self.create_many_inner(batch).await;
        traced::<T, _>("CREATE_MANY", None, result)
    }

    async fn get(&mut self, id: &T::Id) -> Result<T, DataError> {
        let result = self.load(id, false).await;
        traced::<T, _>("GET", Some(id), result)
    }

    async fn find(&mut self, id: &T::Id) -> Result<Option<T>, DataError> {
        let result = self.find_inner(id).await;
        traced::<T, _>("FIND", Some(id), result)
    }

    async fn list(&mut self, query: &ListQuery) -> Result<Vec<T>, DataError> {
        let result = self.list_inner(query).await;
        traced::<T, _>("LIST", None, result)
    }

    async fn count(&mut self, filters: &[Filter]) -> Result<u64, DataError> {
        let result = self.count_inner(filters).await;
        traced::<T, _>("COUNT", None, result)
    }

    async fn page(&mut self, pageable: &Pageable, filters: &[Filter]) -> Result<Page<T>, DataError> {
        let result = self.page_inner(pageable, filters).await;
        traced::<T, _>("PAGE", None, result)
    }

    async fn update(&mut self, id: &T::Id, fields: &Fields) -> Result<T, DataError> {
        let result = self.update_inner(id, fields).await;
        traced::<T, _>("UPDATE", Some(id), result)
    }

    async fn delete(&mut self, id: &T::Id) -> Result<T, DataError> {
        let result = self.delete_inner(id).await;
        traced::<T, _>("DELETE", Some(id), result)
    }
}

fn log_statement(statement: &Statement) {
    tracing::debug!(sql = %statement.sql, params = statement.params.len(), "Executing statement");
}

fn traced<T: Entity, R>(
    operation: &'static str,
    id: Option<&T::Id>,
    result: Result<R, DataError>,
) -> Result<R, DataError> {
    let id = id.map(tracing::field::display);
    match &result {
        Ok(_) => tracing::debug!(table = T::table_name(), operation, id, "DB operation succeeded"),
        Err(err) => tracing::warn!(
            table = T::table_name(),
            operation,
            id,
            error = %err,
            "DB operation failed"
        ),
    }
    result
}

#[cfg(all(test, any(feature = "sqlite", feature = "postgres", feature = "mysql")))]
mod tests {
    use super::*;
    use sqlx::{ColumnIndex, Decode, Row, Type};

    #[derive(Debug)]
    struct Account {
        id: i64,
        name: String,
    }

    impl Entity for Account {
        type Id = i64;
        fn table_name() -> &'static str {
            "accounts"
        }
        fn id_column() -> &'static str {
            "id"
        }
        fn columns() -> &'static [&'static str] {
            &["id", "name"]
        }
        fn id(&self) -> &i64 {
            &self.id
        }
    }

    impl<'r, R> FromRow<'r, R> for Account
    where
        R: Row,
        &'static str: ColumnIndex<R>,
        i64: Decode<'r, R::Database> + Type<R::Database>,
        String: Decode<'r, R::Database> + Type<R::Database>,
    {
        fn from_row(row: &'r R) -> Result<Self, sqlx::Error> {
            Ok(Self {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            })
        }
    }

    fn assert_repository<R: Repository<Account>>() {}

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_repository_implements_every_operation() {
        assert_repository::<SqlxRepository<'static, Account, sqlx::Sqlite>>();
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn test_postgres_repository_implements_every_operation() {
        assert_repository::<SqlxRepository<'static, Account, sqlx::Postgres>>();
    }

    #[cfg(feature = "mysql")]
    #[test]
    fn test_mysql_repository_implements_every_operation() {
        assert_repository::<SqlxRepository<'static, Account, sqlx::MySql>>();
        let statements = Statements::<Account>::new(<sqlx::MySql as Backend>::DIALECT);
        let insert = statements.insert(&crudkit_data::fields! { "name" => "Ann" }).unwrap();
        assert_eq!(insert.sql, "INSERT INTO accounts (name) VALUES (?)");
    }
}
