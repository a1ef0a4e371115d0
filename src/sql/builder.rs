//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from an entity descriptor.

use crate::entity::EntityDef;
use serde_json::Value;
use std::collections::HashMap;

/// Quote identifier for PostgreSQL (safe: only descriptor-sourced names).
/// Needed because "idDirector" would otherwise fold to lowercase.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Primary key first, then columns in descriptor order.
fn select_column_list(entity: &EntityDef) -> String {
    let mut cols = vec![quoted(entity.pk)];
    cols.extend(entity.columns.iter().map(|c| quoted(c.name)));
    cols.join(", ")
}

/// All values bind as text, so every placeholder carries an explicit cast.
fn cast_placeholder(n: usize, pg_type: &str) -> String {
    format!("${}::{}", n, pg_type)
}

/// SELECT every row, no ordering (the full unordered set).
pub fn select_all(entity: &EntityDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {}",
        select_column_list(entity),
        quoted(entity.table)
    );
    q
}

/// SELECT one row by primary key.
pub fn select_by_id(entity: &EntityDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::Number(id.into()));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list(entity),
        quoted(entity.table),
        quoted(entity.pk),
        cast_placeholder(n, "int8")
    );
    q
}

/// INSERT every descriptor column; fields missing from the body bind as NULL
/// and surface as whatever error the schema produces. RETURNING the new key.
pub fn insert(entity: &EntityDef, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(entity.columns.len());
    let mut placeholders = Vec::with_capacity(entity.columns.len());
    for c in entity.columns {
        let val = body.get(c.name).cloned().unwrap_or(Value::Null);
        let n = q.push_param(val);
        cols.push(quoted(c.name));
        placeholders.push(cast_placeholder(n, c.pg_type));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(entity.table),
        cols.join(", "),
        placeholders.join(", "),
        quoted(entity.pk)
    );
    q
}

/// Full-row UPDATE by primary key: SET every descriptor column, so a PUT is
/// an overwrite, never a merge.
pub fn update(entity: &EntityDef, id: i64, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(entity.columns.len());
    for c in entity.columns {
        let val = body.get(c.name).cloned().unwrap_or(Value::Null);
        let n = q.push_param(val);
        sets.push(format!("{} = {}", quoted(c.name), cast_placeholder(n, c.pg_type)));
    }
    let n = q.push_param(Value::Number(id.into()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quoted(entity.table),
        sets.join(", "),
        quoted(entity.pk),
        cast_placeholder(n, "int8")
    );
    q
}

/// DELETE by primary key.
pub fn delete(entity: &EntityDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::Number(id.into()));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        quoted(entity.table),
        quoted(entity.pk),
        cast_placeholder(n, "int8")
    );
    q
}
