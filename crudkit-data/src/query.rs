use crate::filter::{Direction, Filter, Sort};
use crate::value::{Fields, Value};

/// SQL flavour a statement is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Generic SQL using `?` placeholders (default).
    Generic,
    /// SQLite-style `?` placeholders.
    Sqlite,
    /// MySQL-style `?` placeholders with backtick quoting.
    MySql,
    /// Postgres-style `$1, $2, ...` placeholders.
    Postgres,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Generic | Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }

    fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Generic | Dialect::Sqlite | Dialect::Postgres => '"',
        }
    }

    /// Whether `INSERT ... RETURNING` is available.
    pub fn supports_returning(self) -> bool {
        matches!(self, Dialect::Sqlite | Dialect::Postgres)
    }

    /// Whether `SELECT ... FOR UPDATE NOWAIT` is available.
    pub fn supports_row_locks(self) -> bool {
        matches!(self, Dialect::Postgres | Dialect::MySql)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierPolicy {
    /// Validate identifiers against a conservative pattern.
    Validate,
    /// Validate and quote identifiers using the dialect quoting style.
    Quote,
}

/// A fluent builder rendering parameterised statements for one table.
///
/// Every identifier is checked before it reaches the SQL text, and values
/// are always bound (except `NULL`, which is written literally).
///
/// # Example
///
/// ```ignore
/// let (sql, params) = QueryBuilder::new("users")
///     .where_eq("email", "a@b.com")
///     .where_like("name", "%alice%")
///     .order_by("id", true)
///     .limit(10)
///     .build_select(&["id", "name"])?;
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    filters: Vec<Filter>,
    order: Vec<Sort>,
    limit_val: Option<u64>,
    offset_val: Option<u64>,
    lock: bool,
    dialect: Dialect,
    identifier_policy: IdentifierPolicy,
}

/// Accumulates bound values and hands out the matching placeholders.
struct Binder {
    dialect: Dialect,
    params: Vec<Value>,
}

impl Binder {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            params: Vec::new(),
        }
    }

    fn bind(&mut self, value: &Value) -> String {
        if value.is_null() {
            return "NULL".to_string();
        }
        self.params.push(value.clone());
        self.dialect.placeholder(self.params.len())
    }
}

impl QueryBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            limit_val: None,
            offset_val: None,
            lock: false,
            dialect: Dialect::Generic,
            identifier_policy: IdentifierPolicy::Validate,
        }
    }

    /// Create a new builder with an explicit SQL dialect.
    pub fn new_with_dialect(table: &str, dialect: Dialect) -> Self {
        Self::new(table).dialect(dialect)
    }

    /// Set the SQL dialect (affects placeholder style and quoting).
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Configure identifier quoting.
    pub fn identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::eq(column, value))
    }

    pub fn where_not_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::ne(column, value))
    }

    pub fn where_like(self, column: &str, pattern: &str) -> Self {
        self.filter(Filter::like(column, pattern))
    }

    pub fn where_gt(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::gt(column, value))
    }

    pub fn where_lt(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::lt(column, value))
    }

    pub fn where_in<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.filter(Filter::is_in(column, values))
    }

    pub fn where_null(self, column: &str) -> Self {
        self.filter(Filter::is_null(column))
    }

    pub fn where_not_null(self, column: &str) -> Self {
        self.filter(Filter::is_not_null(column))
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order.push(if ascending {
            Sort::asc(column)
        } else {
            Sort::desc(column)
        });
        self
    }

    pub fn sort(mut self, sort: impl IntoIterator<Item = Sort>) -> Self {
        self.order.extend(sort);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_val = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset_val = Some(offset);
        self
    }

    /// Lock the selected rows (`FOR UPDATE NOWAIT`) on dialects that
    /// support row locks; ignored elsewhere.
    pub fn for_update(mut self) -> Self {
        self.lock = true;
        self
    }

    /// Build a SELECT query returning `(sql, bind_values)`.
    ///
    /// `columns` may contain `"*"` (or `"table.*"`).
    pub fn build_select(&self, columns: &[&str]) -> Result<(String, Vec<Value>), QueryError> {
        let table = self.format_identifier_checked(&self.table, false, "table")?;
        let columns = self.format_column_list_checked(columns, true)?;

        let mut sql = format!("SELECT {columns} FROM {table}");
        let mut binder = Binder::new(self.dialect);
        self.append_where(&mut sql, &mut binder)?;
        self.append_order(&mut sql)?;
        self.append_limit_offset(&mut sql);
        if self.lock && self.dialect.supports_row_locks() {
            sql.push_str(" FOR UPDATE NOWAIT");
        }
        Ok((sql, binder.params))
    }

    /// Build a COUNT query returning `(sql, bind_values)`.
    pub fn build_count(&self) -> Result<(String, Vec<Value>), QueryError> {
        let table = self.format_identifier_checked(&self.table, false, "table")?;
        let mut sql = format!("SELECT COUNT(*) FROM {table}");
        let mut binder = Binder::new(self.dialect);
        self.append_where(&mut sql, &mut binder)?;
        Ok((sql, binder.params))
    }

    /// Build an INSERT of one row. `returning` lists the columns to read
    /// back and must be empty on dialects without `RETURNING`.
    pub fn build_insert(
        &self,
        fields: &Fields,
        returning: &[&str],
    ) -> Result<(String, Vec<Value>), QueryError> {
        let table = self.format_identifier_checked(&self.table, false, "table")?;
        let mut binder = Binder::new(self.dialect);

        let mut sql = if fields.is_empty() {
            match self.dialect {
                Dialect::MySql => format!("INSERT INTO {table} () VALUES ()"),
                _ => format!("INSERT INTO {table} DEFAULT VALUES"),
            }
        } else {
            let mut columns = Vec::with_capacity(fields.len());
            let mut values = Vec::with_capacity(fields.len());
            for (name, value) in fields {
                columns.push(self.format_identifier_checked(name, false, "column")?);
                values.push(binder.bind(value));
            }
            format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                columns.join(", "),
                values.join(", ")
            )
        };

        if !returning.is_empty() {
            if !self.dialect.supports_returning() {
                return Err(QueryError::Unsupported {
                    feature: "RETURNING",
                    dialect: self.dialect,
                });
            }
            sql.push_str(" RETURNING ");
            sql.push_str(&self.format_column_list_checked(returning, false)?);
        }
        Ok((sql, binder.params))
    }

    /// Build an UPDATE of the rows matching the filters. `touch` names a
    /// column set to `CURRENT_TIMESTAMP` alongside the fields.
    pub fn build_update(
        &self,
        fields: &Fields,
        touch: Option<&str>,
    ) -> Result<(String, Vec<Value>), QueryError> {
        let table = self.format_identifier_checked(&self.table, false, "table")?;
        let mut binder = Binder::new(self.dialect);

        let mut assignments = Vec::with_capacity(fields.len() + 1);
        for (name, value) in fields {
            let column = self.format_identifier_checked(name, false, "column")?;
            assignments.push(format!("{column} = {}", binder.bind(value)));
        }
        if let Some(touch) = touch {
            let column = self.format_identifier_checked(touch, false, "column")?;
            assignments.push(format!("{column} = CURRENT_TIMESTAMP"));
        }
        if assignments.is_empty() {
            return Err(QueryError::EmptyUpdate);
        }

        let mut sql = format!("UPDATE {table} SET {}", assignments.join(", "));
        self.append_where(&mut sql, &mut binder)?;
        Ok((sql, binder.params))
    }

    /// Build a DELETE of the rows matching the filters.
    pub fn build_delete(&self) -> Result<(String, Vec<Value>), QueryError> {
        let table = self.format_identifier_checked(&self.table, false, "table")?;
        let mut sql = format!("DELETE FROM {table}");
        let mut binder = Binder::new(self.dialect);
        self.append_where(&mut sql, &mut binder)?;
        Ok((sql, binder.params))
    }

    fn append_where(&self, sql: &mut String, binder: &mut Binder) -> Result<(), QueryError> {
        if self.filters.is_empty() {
            return Ok(());
        }
        let clauses = self
            .filters
            .iter()
            .map(|f| self.render_filter(f, binder))
            .collect::<Result<Vec<_>, _>>()?;
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
        Ok(())
    }

    fn render_filter(&self, filter: &Filter, binder: &mut Binder) -> Result<String, QueryError> {
        let col = |c: &String| self.format_identifier_checked(c, false, "column");
        let clause = match filter {
            Filter::Eq(c, v) if v.is_null() => format!("{} IS NULL", col(c)?),
            Filter::Ne(c, v) if v.is_null() => format!("{} IS NOT NULL", col(c)?),
            Filter::Eq(c, v) => format!("{} = {}", col(c)?, binder.bind(v)),
            Filter::Ne(c, v) => format!("{} != {}", col(c)?, binder.bind(v)),
            Filter::Gt(c, v) => format!("{} > {}", col(c)?, binder.bind(v)),
            Filter::Ge(c, v) => format!("{} >= {}", col(c)?, binder.bind(v)),
            Filter::Lt(c, v) => format!("{} < {}", col(c)?, binder.bind(v)),
            Filter::Le(c, v) => format!("{} <= {}", col(c)?, binder.bind(v)),
            Filter::Like(c, pattern) => {
                format!("{} LIKE {}", col(c)?, binder.bind(&Value::Text(pattern.clone())))
            }
            Filter::In(c, values) => {
                let c = col(c)?;
                if values.is_empty() {
                    // Nothing is a member of the empty set
                    "1 = 0".to_string()
                } else {
                    let placeholders: Vec<_> = values.iter().map(|v| binder.bind(v)).collect();
                    format!("{c} IN ({})", placeholders.join(", "))
                }
            }
            Filter::IsNull(c) => format!("{} IS NULL", col(c)?),
            Filter::IsNotNull(c) => format!("{} IS NOT NULL", col(c)?),
            Filter::And(filters) => self.render_group(filters, " AND ", "1 = 1", binder)?,
            Filter::Or(filters) => self.render_group(filters, " OR ", "1 = 0", binder)?,
            Filter::Not(inner) => format!("NOT ({})", self.render_filter(inner, binder)?),
        };
        Ok(clause)
    }

    fn render_group(
        &self,
        filters: &[Filter],
        separator: &str,
        empty: &str,
        binder: &mut Binder,
    ) -> Result<String, QueryError> {
        match filters {
            [] => Ok(empty.to_string()),
            [single] => self.render_filter(single, binder),
            many => {
                let parts = many
                    .iter()
                    .map(|f| self.render_filter(f, binder))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("({})", parts.join(separator)))
            }
        }
    }

    fn append_order(&self, sql: &mut String) -> Result<(), QueryError> {
        if self.order.is_empty() {
            return Ok(());
        }
        let mut clauses = Vec::with_capacity(self.order.len());
        for sort in &self.order {
            let col = self.format_identifier_checked(&sort.column, false, "column")?;
            match sort.direction {
                Direction::Asc => clauses.push(format!("{col} ASC")),
                Direction::Desc => clauses.push(format!("{col} DESC")),
            }
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&clauses.join(", "));
        Ok(())
    }

    fn append_limit_offset(&self, sql: &mut String) {
        // Databases read LIMIT and OFFSET as signed 64-bit integers
        let limit = self.limit_val.map(clamp_to_bigint);
        let offset = self.offset_val.map(clamp_to_bigint);
        match (limit, offset) {
            (Some(limit), offset) => {
                sql.push_str(&format!(" LIMIT {limit}"));
                if let Some(offset) = offset {
                    sql.push_str(&format!(" OFFSET {offset}"));
                }
            }
            // SQLite and MySQL only accept OFFSET after a LIMIT
            (None, Some(offset)) => match self.dialect {
                Dialect::Sqlite => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
                Dialect::MySql => {
                    sql.push_str(&format!(" LIMIT {} OFFSET {offset}", u64::MAX))
                }
                Dialect::Generic | Dialect::Postgres => {
                    sql.push_str(&format!(" OFFSET {offset}"))
                }
            },
            (None, None) => {}
        }
    }

    fn format_column_list_checked(
        &self,
        columns: &[&str],
        allow_star: bool,
    ) -> Result<String, QueryError> {
        let out = columns
            .iter()
            .map(|col| self.format_identifier_checked(col, allow_star, "column"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(out.join(", "))
    }

    fn format_identifier_checked(
        &self,
        ident: &str,
        allow_star: bool,
        kind: &'static str,
    ) -> Result<String, QueryError> {
        if !is_valid_identifier(ident, allow_star) {
            return Err(QueryError::InvalidIdentifier {
                kind,
                ident: ident.to_string(),
            });
        }
        match self.identifier_policy {
            IdentifierPolicy::Quote => Ok(quote_identifier(ident, self.dialect)),
            IdentifierPolicy::Validate => Ok(ident.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidIdentifier { kind: &'static str, ident: String },
    Unsupported { feature: &'static str, dialect: Dialect },
    EmptyUpdate,
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidIdentifier { kind, ident } => {
                write!(f, "Invalid {kind} identifier: {ident}")
            }
            QueryError::Unsupported { feature, dialect } => {
                write!(f, "{feature} is not supported by the {dialect:?} dialect")
            }
            QueryError::EmptyUpdate => write!(f, "UPDATE without any column to set"),
        }
    }
}

impl std::error::Error for QueryError {}

fn clamp_to_bigint(n: u64) -> u64 {
    n.min(i64::MAX as u64)
}

fn is_valid_identifier(ident: &str, allow_star: bool) -> bool {
    if ident.is_empty() {
        return false;
    }
    let parts: Vec<&str> = ident.split('.').collect();
    let last = parts.len() - 1;
    parts.iter().enumerate().all(|(idx, part)| {
        (allow_star && *part == "*" && idx == last) || is_valid_segment(part)
    })
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote_identifier(ident: &str, dialect: Dialect) -> String {
    let quote = dialect.quote_char();
    ident
        .split('.')
        .map(|part| {
            if part == "*" {
                part.to_string()
            } else {
                format!("{quote}{part}{quote}")
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;

    #[test]
    fn test_simple_select() {
        let (sql, params) = QueryBuilder::new("users").build_select(&["*"]).unwrap();
        assert_eq!(sql, "SELECT * FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_where_eq() {
        let (sql, params) = QueryBuilder::new("users")
            .where_eq("email", "a@b.com")
            .build_select(&["*"])
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE email = ?");
        assert_eq!(params, vec![Value::from("a@b.com")]);
    }

    #[test]
    fn test_complex_query() {
        let (sql, params) = QueryBuilder::new("users")
            .where_eq("status", "active")
            .where_like("name", "%alice%")
            .order_by("id", true)
            .limit(10)
            .offset(20)
            .build_select(&["id", "name"])
            .unwrap();
        assert_eq!(
            sql,
            "SELECT id, name FROM users WHERE status = ? AND name LIKE ? ORDER BY id ASC LIMIT 10 OFFSET 20"
        );
        assert_eq!(params, vec![Value::from("active"), Value::from("%alice%")]);
    }

    #[test]
    fn test_count_query() {
        let (sql, params) = QueryBuilder::new("users")
            .where_eq("active", true)
            .build_count()
            .unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM users WHERE active = ?");
        assert_eq!(params, vec![Value::Bool(true)]);
    }

    #[test]
    fn test_postgres_placeholders() {
        let (sql, params) = QueryBuilder::new_with_dialect("users", Dialect::Postgres)
            .where_eq("status", "active")
            .where_in("role", ["admin", "user"])
            .build_select(&["*"])
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM users WHERE status = $1 AND role IN ($2, $3)"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_quoting() {
        let (sql, params) = QueryBuilder::new("users")
            .dialect(Dialect::Postgres)
            .identifier_policy(IdentifierPolicy::Quote)
            .where_eq("users.email", "a@b.com")
            .order_by("users.id", true)
            .build_select(&["users.id", "users.email"])
            .unwrap();
        assert_eq!(
            sql,
            "SELECT \"users\".\"id\", \"users\".\"email\" FROM \"users\" WHERE \"users\".\"email\" = $1 ORDER BY \"users\".\"id\" ASC"
        );
        assert_eq!(params, vec![Value::from("a@b.com")]);
    }

    #[test]
    fn test_mysql_backticks() {
        let (sql, _) = QueryBuilder::new_with_dialect("users", Dialect::MySql)
            .identifier_policy(IdentifierPolicy::Quote)
            .where_eq("order", 1)
            .build_select(&["*"])
            .unwrap();
        assert_eq!(sql, "SELECT * FROM `users` WHERE `order` = ?");
    }

    #[test]
    fn test_invalid_identifier() {
        let err = QueryBuilder::new("users;drop").build_select(&["*"]).unwrap_err();
        assert!(matches!(err, QueryError::InvalidIdentifier { kind: "table", .. }));

        let err = QueryBuilder::new("users")
            .where_eq("name = name OR 1", 1)
            .build_select(&["*"])
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidIdentifier { kind: "column", .. }));
    }

    #[test]
    fn test_null_comparisons_become_is_null() {
        let (sql, params) = QueryBuilder::new("users")
            .where_eq("email", Value::Null)
            .where_not_eq("name", Value::Null)
            .build_select(&["id"])
            .unwrap();
        assert_eq!(
            sql,
            "SELECT id FROM users WHERE email IS NULL AND name IS NOT NULL"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_nested_groups() {
        let (sql, params) = QueryBuilder::new_with_dialect("students", Dialect::Postgres)
            .filter(Filter::or([
                Filter::eq("id", 1),
                Filter::and([Filter::gt("id", 4), Filter::not(Filter::eq("name", "x"))]),
            ]))
            .build_select(&["id"])
            .unwrap();
        assert_eq!(
            sql,
            "SELECT id FROM students WHERE (id = $1 OR (id > $2 AND NOT (name = $3)))"
        );
        assert_eq!(params, vec![Value::Int(1), Value::Int(4), Value::from("x")]);
    }

    #[test]
    fn test_empty_groups_and_membership() {
        let (sql, params) = QueryBuilder::new("users")
            .where_in("id", Vec::<i64>::new())
            .filter(Filter::and([]))
            .filter(Filter::or([]))
            .build_select(&["id"])
            .unwrap();
        assert_eq!(sql, "SELECT id FROM users WHERE 1 = 0 AND 1 = 1 AND 1 = 0");
        assert!(params.is_empty());
    }

    #[test]
    fn test_offset_without_limit_per_dialect() {
        let sql = |dialect| {
            QueryBuilder::new_with_dialect("users", dialect)
                .offset(5)
                .build_select(&["id"])
                .unwrap()
                .0
        };
        assert_eq!(sql(Dialect::Sqlite), "SELECT id FROM users LIMIT -1 OFFSET 5");
        assert_eq!(
            sql(Dialect::MySql),
            "SELECT id FROM users LIMIT 18446744073709551615 OFFSET 5"
        );
        assert_eq!(sql(Dialect::Postgres), "SELECT id FROM users OFFSET 5");
    }

    #[test]
    fn test_oversized_window_is_clamped() {
        let (sql, _) = QueryBuilder::new_with_dialect("users", Dialect::Sqlite)
            .limit(u64::MAX)
            .offset(u64::MAX)
            .build_select(&["id"])
            .unwrap();
        assert_eq!(
            sql,
            "SELECT id FROM users LIMIT 9223372036854775807 OFFSET 9223372036854775807"
        );

        let (sql, _) = QueryBuilder::new_with_dialect("users", Dialect::MySql)
            .offset(u64::MAX)
            .build_select(&["id"])
            .unwrap();
        assert_eq!(
            sql,
            "SELECT id FROM users LIMIT 18446744073709551615 OFFSET 9223372036854775807"
        );
    }

    #[test]
    fn test_row_lock_only_where_supported() {
        let build = |dialect| {
            QueryBuilder::new_with_dialect("users", dialect)
                .where_eq("id", 1)
                .for_update()
                .build_select(&["id"])
                .unwrap()
                .0
        };
        assert_eq!(
            build(Dialect::Postgres),
            "SELECT id FROM users WHERE id = $1 FOR UPDATE NOWAIT"
        );
        assert_eq!(build(Dialect::Sqlite), "SELECT id FROM users WHERE id = ?");
    }

    #[test]
    fn test_insert_with_returning() {
        let (sql, params) = QueryBuilder::new_with_dialect("users", Dialect::Postgres)
            .build_insert(&fields! { "name" => "Ann", "age" => 30, "email" => Value::Null }, &["id", "name"])
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO users (age, email, name) VALUES ($1, NULL, $2) RETURNING id, name"
        );
        assert_eq!(params, vec![Value::Int(30), Value::from("Ann")]);
    }

    #[test]
    fn test_insert_defaults() {
        let (sql, _) = QueryBuilder::new_with_dialect("users", Dialect::Sqlite)
            .build_insert(&Fields::new(), &["id"])
            .unwrap();
        assert_eq!(sql, "INSERT INTO users DEFAULT VALUES RETURNING id");

        let (sql, _) = QueryBuilder::new_with_dialect("users", Dialect::MySql)
            .build_insert(&Fields::new(), &[])
            .unwrap();
        assert_eq!(sql, "INSERT INTO users () VALUES ()");
    }

    #[test]
    fn test_insert_returning_unsupported() {
        let err = QueryBuilder::new_with_dialect("users", Dialect::MySql)
            .build_insert(&fields! { "name" => "Ann" }, &["id"])
            .unwrap_err();
        assert!(matches!(err, QueryError::Unsupported { feature: "RETURNING", .. }));
    }

    #[test]
    fn test_update_numbers_placeholders_across_clauses() {
        let (sql, params) = QueryBuilder::new_with_dialect("users", Dialect::Postgres)
            .where_eq("id", 7)
            .build_update(&fields! { "age" => 31, "name" => "Ann" }, Some("updated_at"))
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE users SET age = $1, name = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $3"
        );
        assert_eq!(params, vec![Value::Int(31), Value::from("Ann"), Value::Int(7)]);
    }

    #[test]
    fn test_update_requires_assignments() {
        let err = QueryBuilder::new("users")
            .where_eq("id", 7)
            .build_update(&Fields::new(), None)
            .unwrap_err();
        assert_eq!(err, QueryError::EmptyUpdate);
    }

    #[test]
    fn test_delete() {
        let (sql, params) = QueryBuilder::new("users")
            .where_eq("id", 7)
            .build_delete()
            .unwrap();
        assert_eq!(sql, "DELETE FROM users WHERE id = ?");
        assert_eq!(params, vec![Value::Int(7)]);
    }
}
