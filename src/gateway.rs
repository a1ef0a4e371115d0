//! Database gateway: execute a parameterized statement, get rows or an error.
//!
//! Handlers only ever see this trait, so tests can substitute a scripted
//! fake for the PostgreSQL-backed implementation.

use crate::error::AppError;
use crate::sql::PgBindValue;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Run a query, return every row as a column-name-keyed JSON object.
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>, AppError>;

    /// Run a query expected to match at most one row.
    async fn fetch_optional(&self, sql: &str, params: &[Value]) -> Result<Option<Value>, AppError>;

    /// Run an INSERT .. RETURNING <pk> and return the generated key.
    async fn fetch_generated_id(&self, sql: &str, params: &[Value]) -> Result<i64, AppError>;

    /// Run a statement that returns no rows (UPDATE/DELETE).
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, AppError>;
}

pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        PgGateway { pool }
    }

    fn bind_all<'q>(
        sql: &'q str,
        params: &[Value],
    ) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
        let mut query = sqlx::query(sql);
        for p in params {
            query = query.bind(PgBindValue::from_json(p));
        }
        query
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %sql, params = ?params, "query");
        let rows = Self::bind_all(sql, params).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn fetch_optional(&self, sql: &str, params: &[Value]) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %sql, params = ?params, "query");
        let row = Self::bind_all(sql, params).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn fetch_generated_id(&self, sql: &str, params: &[Value]) -> Result<i64, AppError> {
        tracing::debug!(sql = %sql, params = ?params, "insert");
        let row = Self::bind_all(sql, params).fetch_one(&self.pool).await?;
        use sqlx::Row;
        Ok(row.try_get::<i64, _>(0)?)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, AppError> {
        tracing::debug!(sql = %sql, params = ?params, "execute");
        let result = Self::bind_all(sql, params).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    Value::Null
}
