use std::marker::PhantomData;

use crate::config::RepositoryConfig;
use crate::entity::{check_column, check_columns, Entity};
use crate::error::DataError;
use crate::filter::{Filter, ListQuery, Sort};
use crate::query::{Dialect, IdentifierPolicy, QueryBuilder};
use crate::value::{Fields, Value};

/// A rendered statement and the values to bind, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl From<(String, Vec<Value>)> for Statement {
    fn from((sql, params): (String, Vec<Value>)) -> Self {
        Self { sql, params }
    }
}

/// Renders the CRUD statements of one entity type.
///
/// Every field, filter and sort name is checked against `T::columns()`
/// before anything is rendered, so a `Validation` error always means no
/// statement reached the database.
pub struct Statements<T> {
    dialect: Dialect,
    config: RepositoryConfig,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Statements<T> {
    fn clone(&self) -> Self {
        Self {
            dialect: self.dialect,
            config: self.config.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Statements<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statements")
            .field("dialect", &self.dialect)
            .field("config", &self.config)
            .finish()
    }
}

impl<T: Entity> Statements<T> {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_config(dialect, RepositoryConfig::default())
    }

    pub fn with_config(dialect: Dialect, config: RepositoryConfig) -> Self {
        Self {
            dialect,
            config,
            _marker: PhantomData,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    fn builder(&self) -> QueryBuilder {
        let policy = if self.config.quote_identifiers {
            IdentifierPolicy::Quote
        } else {
            IdentifierPolicy::Validate
        };
        QueryBuilder::new_with_dialect(T::table_name(), self.dialect).identifier_policy(policy)
    }

    /// Validate create input and drop a database-generated key from it.
    pub fn insert_fields(&self, fields: &Fields) -> Result<Fields, DataError> {
        check_columns::<T>(fields.names())?;
        let mut fields = fields.clone();
        if T::id_is_generated() && fields.remove(T::id_column()).is_some() {
            tracing::debug!(
                table = T::table_name(),
                column = T::id_column(),
                "Ignoring supplied value for generated key"
            );
        }
        Ok(fields)
    }

    /// `INSERT` of one row; reads every column back when the dialect has
    /// `RETURNING`.
    pub fn insert(&self, fields: &Fields) -> Result<Statement, DataError> {
        let fields = self.insert_fields(fields)?;
        let returning: &[&str] = if self.dialect.supports_returning() {
            T::columns()
        } else {
            &[]
        };
        Ok(self.builder().build_insert(&fields, returning)?.into())
    }

    pub fn select_by_id(&self, id: &T::Id, lock: bool) -> Result<Statement, DataError> {
        self.select_by_key(id.clone().into(), lock)
    }

    /// Row lookup by a raw key value, as read back after an insert.
    pub fn select_by_key(&self, key: Value, lock: bool) -> Result<Statement, DataError> {
        let mut builder = self.builder().where_eq(T::id_column(), key);
        if lock && self.config.lock_on_update {
            builder = builder.for_update();
        }
        Ok(builder.build_select(T::columns())?.into())
    }

    pub fn select(&self, query: &ListQuery) -> Result<Statement, DataError> {
        self.check_filters(&query.filters)?;
        check_columns::<T>(query.sort.iter().map(|s| s.column.as_str()))?;

        let mut sort = query.sort.clone();
        if !sort.iter().any(|s| s.column == T::id_column()) {
            sort.push(Sort::asc(T::id_column()));
        }

        let mut builder = self
            .builder()
            .filters(query.filters.iter().cloned())
            .sort(sort);
        if let Some(limit) = self.config.effective_limit(query.limit) {
            builder = builder.limit(limit);
        }
        if query.offset > 0 {
            builder = builder.offset(query.offset);
        }
        Ok(builder.build_select(T::columns())?.into())
    }

    pub fn count(&self, filters: &[Filter]) -> Result<Statement, DataError> {
        self.check_filters(filters)?;
        Ok(self
            .builder()
            .filters(filters.iter().cloned())
            .build_count()?
            .into())
    }

    /// Validate update input and drop the key, which is never rewritten.
    pub fn update_fields(&self, fields: &Fields) -> Result<Fields, DataError> {
        check_columns::<T>(fields.names())?;
        let mut fields = fields.clone();
        if fields.remove(T::id_column()).is_some() {
            tracing::debug!(
                table = T::table_name(),
                column = T::id_column(),
                "Ignoring key in update input"
            );
        }
        Ok(fields)
    }

    /// `UPDATE` of one row, or `None` when there is nothing to write.
    pub fn update(&self, id: &T::Id, fields: &Fields) -> Result<Option<Statement>, DataError> {
        let fields = self.update_fields(fields)?;
        let touch = T::touch_column().filter(|column| !fields.contains(column));
        if let Some(column) = touch {
            check_column::<T>(column)?;
        }
        if fields.is_empty() && touch.is_none() {
            return Ok(None);
        }
        let statement = self
            .builder()
            .where_eq(T::id_column(), id.clone())
            .build_update(&fields, touch)?;
        Ok(Some(statement.into()))
    }

    pub fn delete(&self, id: &T::Id) -> Result<Statement, DataError> {
        Ok(self
            .builder()
            .where_eq(T::id_column(), id.clone())
            .build_delete()?
            .into())
    }

    fn check_filters(&self, filters: &[Filter]) -> Result<(), DataError> {
        check_columns::<T>(filters.iter().flat_map(Filter::columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;

    struct User {
        id: i64,
    }

    impl Entity for User {
        type Id = i64;
        fn table_name() -> &'static str {
            "users"
        }
        fn id_column() -> &'static str {
            "id"
        }
        fn columns() -> &'static [&'static str] {
            &["id", "name", "age"]
        }
        fn id(&self) -> &i64 {
            &self.id
        }
    }

    struct Note {
        code: String,
    }

    impl Entity for Note {
        type Id = String;
        fn table_name() -> &'static str {
            "notes"
        }
        fn id_column() -> &'static str {
            "code"
        }
        fn columns() -> &'static [&'static str] {
            &["code", "body", "updated_on"]
        }
        fn id(&self) -> &String {
            &self.code
        }
        fn id_is_generated() -> bool {
            false
        }
        fn touch_column() -> Option<&'static str> {
            Some("updated_on")
        }
    }

    #[test]
    fn test_insert_strips_generated_key() {
        let stmt = Statements::<User>::new(Dialect::Sqlite)
            .insert(&fields! { "id" => 99, "name" => "Ann", "age" => 30 })
            .unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO users (age, name) VALUES (?, ?) RETURNING id, name, age"
        );
        assert_eq!(stmt.params, vec![Value::Int(30), Value::from("Ann")]);
    }

    #[test]
    fn test_insert_keeps_supplied_key() {
        let stmt = Statements::<Note>::new(Dialect::MySql)
            .insert(&fields! { "code" => "n1", "body" => "hi" })
            .unwrap();
        assert_eq!(stmt.sql, "INSERT INTO notes (body, code) VALUES (?, ?)");
    }

    #[test]
    fn test_mysql_insert_reads_back_generated_key() {
        let statements = Statements::<User>::new(Dialect::MySql);
        let stmt = statements
            .insert(&fields! { "id" => 99, "name" => "Ann", "age" => 30 })
            .unwrap();
        assert_eq!(stmt.sql, "INSERT INTO users (age, name) VALUES (?, ?)");
        assert_eq!(stmt.params, vec![Value::Int(30), Value::from("Ann")]);

        // The key comes from last_insert_id, never from the caller
        let lookup = statements.select_by_key(Value::Int(1), false).unwrap();
        assert_eq!(lookup.sql, "SELECT id, name, age FROM users WHERE id = ?");
        assert_eq!(lookup.params, vec![Value::Int(1)]);
    }

    #[test]
    fn test_mysql_insert_reads_back_supplied_key() {
        let statements = Statements::<Note>::new(Dialect::MySql);
        let fields = fields! { "code" => "n1", "body" => "hi" };
        let stmt = statements.insert(&fields).unwrap();
        assert_eq!(stmt.sql, "INSERT INTO notes (body, code) VALUES (?, ?)");

        let key = fields.get(Note::id_column()).cloned().unwrap();
        let lookup = statements.select_by_key(key, false).unwrap();
        assert_eq!(lookup.params, vec![Value::from("n1")]);
        assert_eq!(lookup.sql, "SELECT code, body, updated_on FROM notes WHERE code = ?");
    }

    #[test]
    fn test_zero_limit_is_kept() {
        let stmt = Statements::<User>::new(Dialect::Sqlite)
            .select(&ListQuery::new().limit(0))
            .unwrap();
        assert!(stmt.sql.ends_with("ORDER BY id ASC LIMIT 0"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let statements = Statements::<User>::new(Dialect::Sqlite);
        let err = statements.insert(&fields! { "email" => "x" }).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("'email' is not a column of 'users'"));
        assert!(statements.update(&1, &fields! { "email" => "x" }).is_err());
    }

    #[test]
    fn test_select_appends_key_tie_breaker() {
        let query = ListQuery::new()
            .filter(Filter::gt("age", 18))
            .order_by("name", false)
            .limit(2)
            .offset(4);
        let stmt = Statements::<User>::new(Dialect::Postgres).select(&query).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT id, name, age FROM users WHERE age > $1 ORDER BY name DESC, id ASC LIMIT 2 OFFSET 4"
        );
    }

    #[test]
    fn test_select_keeps_explicit_key_order() {
        let query = ListQuery::new().order_by("id", false);
        let stmt = Statements::<User>::new(Dialect::Sqlite).select(&query).unwrap();
        assert_eq!(stmt.sql, "SELECT id, name, age FROM users ORDER BY id DESC");
    }

    #[test]
    fn test_select_rejects_unknown_filter_and_sort() {
        let statements = Statements::<User>::new(Dialect::Sqlite);
        let nested = ListQuery::new().filter(Filter::or([
            Filter::eq("name", "Ann"),
            Filter::eq("email", "x"),
        ]));
        assert!(statements.select(&nested).unwrap_err().is_validation());
        let sorted = ListQuery::new().order_by("email", true);
        assert!(statements.select(&sorted).unwrap_err().is_validation());
    }

    #[test]
    fn test_select_applies_configured_limits() {
        let config = RepositoryConfig {
            default_limit: Some(10),
            max_limit: Some(20),
            ..Default::default()
        };
        let statements = Statements::<User>::with_config(Dialect::Sqlite, config);
        let stmt = statements.select(&ListQuery::new()).unwrap();
        assert!(stmt.sql.ends_with("LIMIT 10"));
        let stmt = statements.select(&ListQuery::new().limit(500)).unwrap();
        assert!(stmt.sql.ends_with("LIMIT 20"));
    }

    #[test]
    fn test_select_by_id_locks_where_supported() {
        let statements = Statements::<User>::new(Dialect::Postgres);
        assert_eq!(
            statements.select_by_id(&7, true).unwrap().sql,
            "SELECT id, name, age FROM users WHERE id = $1 FOR UPDATE NOWAIT"
        );

        let unlocked = Statements::<User>::with_config(
            Dialect::Postgres,
            RepositoryConfig {
                lock_on_update: false,
                ..Default::default()
            },
        );
        assert!(!unlocked.select_by_id(&7, true).unwrap().sql.contains("FOR UPDATE"));
    }

    #[test]
    fn test_update_strips_key_and_touches() {
        let statements = Statements::<Note>::new(Dialect::Sqlite);
        let stmt = statements
            .update(&"n1".to_string(), &fields! { "code" => "n2", "body" => "hello" })
            .unwrap()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE notes SET body = ?, updated_on = CURRENT_TIMESTAMP WHERE code = ?"
        );
        assert_eq!(stmt.params, vec![Value::from("hello"), Value::from("n1")]);
    }

    #[test]
    fn test_update_without_changes() {
        let statements = Statements::<User>::new(Dialect::Sqlite);
        assert_eq!(statements.update(&1, &fields! { "id" => 2 }).unwrap(), None);
        assert!(Statements::<Note>::new(Dialect::Sqlite)
            .update(&"n1".to_string(), &Fields::new())
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_count_and_delete() {
        let statements = Statements::<User>::with_config(
            Dialect::Postgres,
            RepositoryConfig {
                quote_identifiers: true,
                ..Default::default()
            },
        );
        assert_eq!(
            statements.count(&[Filter::is_null("name")]).unwrap().sql,
            "SELECT COUNT(*) FROM \"users\" WHERE \"name\" IS NULL"
        );
        assert_eq!(
            statements.delete(&3).unwrap().sql,
            "DELETE FROM \"users\" WHERE \"id\" = $1"
        );
    }
}
