//! Entities and schema shared by the end-to-end tests.

use crudkit_data::Entity;
use serde::Serialize;

pub const SCHEMA: &str = r#"
CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    age INTEGER NOT NULL
);

CREATE TABLE notes (
    code TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    body TEXT,
    updated_on TEXT
);
"#;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub age: i64,
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

/// Keyed by a caller-chosen code and stamped on every update.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Note {
    pub code: String,
    pub title: String,
    pub body: Option<String>,
    pub updated_on: Option<String>,
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
        &["code", "title", "body", "updated_on"]
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
