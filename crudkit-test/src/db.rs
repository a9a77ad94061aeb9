use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool};

/// An in-memory SQLite database living as long as its pool.
///
/// The pool holds a single connection that never expires: every
/// `sqlite::memory:` connection is a separate database, so a second
/// connection would see empty tables.
///
/// ```ignore
/// let db = TestDb::with_schema(fixtures::SCHEMA).await?;
/// let mut conn = db.conn().await?;
/// let mut users = SqlxRepository::<User, Sqlite>::new(&mut *conn);
/// ```
#[derive(Clone)]
pub struct TestDb {
    pool: SqlitePool,
}

impl TestDb {
    pub async fn new() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    /// Create the database and run `schema` (several statements allowed).
    pub async fn with_schema(schema: &str) -> Result<Self, sqlx::Error> {
        let db = Self::new().await?;
        db.execute(schema).await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Take the connection. Drop it before beginning a transaction on the pool.
    pub async fn conn(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        self.pool.acquire().await
    }

    pub async fn execute(&self, sql: &str) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(sql).execute(&self.pool).await?;
        Ok(())
    }
}
