use serde::{Deserialize, Serialize};

use crate::page::Pageable;
use crate::value::Value;

/// A predicate on the columns of an entity.
///
/// Top-level filters in a [`ListQuery`] are AND-combined; [`Filter::And`],
/// [`Filter::Or`] and [`Filter::Not`] nest.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    Ne(String, Value),
    Gt(String, Value),
    Ge(String, Value),
    Lt(String, Value),
    Le(String, Value),
    Like(String, String),
    In(String, Vec<Value>),
    IsNull(String),
    IsNotNull(String),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(column.into(), value.into())
    }

    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne(column.into(), value.into())
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Gt(column.into(), value.into())
    }

    pub fn ge(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ge(column.into(), value.into())
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Lt(column.into(), value.into())
    }

    pub fn le(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Le(column.into(), value.into())
    }

    pub fn like(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Like(column.into(), pattern.into())
    }

    pub fn is_in<V: Into<Value>>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In(column.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Filter::IsNull(column.into())
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Filter::IsNotNull(column.into())
    }

    /// Inclusive range, `low <= column <= high`.
    pub fn between(column: impl Into<String>, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        let column = column.into();
        Filter::And(vec![
            Filter::Ge(column.clone(), low.into()),
            Filter::Le(column, high.into()),
        ])
    }

    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// Every column name referenced by this filter, nested ones included.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Filter::Eq(c, _)
            | Filter::Ne(c, _)
            | Filter::Gt(c, _)
            | Filter::Ge(c, _)
            | Filter::Lt(c, _)
            | Filter::Le(c, _)
            | Filter::Like(c, _)
            | Filter::In(c, _)
            | Filter::IsNull(c)
            | Filter::IsNotNull(c) => out.push(c),
            Filter::And(filters) | Filter::Or(filters) => {
                filters.iter().for_each(|f| f.collect_columns(out))
            }
            Filter::Not(inner) => inner.collect_columns(out),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub column: String,
    #[serde(default)]
    pub direction: Direction,
}

impl Sort {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }

    /// Parse a comma-separated sort string: `"name,-age"` sorts by `name`
    /// ascending then `age` descending. Blank segments are skipped.
    pub fn parse_list(list: &str) -> Vec<Sort> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix('-') {
                Some(column) => Sort::desc(column.trim()),
                None => Sort::asc(s.strip_prefix('+').unwrap_or(s).trim()),
            })
            .collect()
    }
}

/// Parameters of a `list` call: filters, sort keys and the offset/limit window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub sort: Vec<Sort>,
    pub offset: u64,
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn order_by(self, column: &str, ascending: bool) -> Self {
        if ascending {
            self.sort(Sort::asc(column))
        } else {
            self.sort(Sort::desc(column))
        }
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Cap the number of rows. `limit(0)` is taken literally and matches
    /// nothing; leave the limit unset to read every row.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The window and sort keys described by a [`Pageable`].
    pub fn from_pageable(pageable: &Pageable) -> Self {
        Self {
            filters: Vec::new(),
            sort: pageable.sorts(),
            offset: pageable.offset(),
            limit: Some(pageable.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_walks_nested_filters() {
        let filter = Filter::or([
            Filter::eq("name", "Ann"),
            Filter::not(Filter::between("age", 18, 30)),
        ]);
        assert_eq!(filter.columns(), vec!["name", "age", "age"]);
    }

    #[test]
    fn test_parse_sort_list() {
        assert_eq!(
            Sort::parse_list("name, -age,,+id"),
            vec![Sort::asc("name"), Sort::desc("age"), Sort::asc("id")]
        );
        assert!(Sort::parse_list("").is_empty());
    }

    #[test]
    fn test_list_query_from_pageable() {
        let pageable = Pageable {
            page: 2,
            size: 10,
            sort: Some("-age".into()),
        };
        let query = ListQuery::from_pageable(&pageable);
        assert_eq!(query.offset, 20);
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.sort, vec![Sort::desc("age")]);
    }
}
