//! Query execution against the external relational store.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use deskbot_core::{AppError, AppResult};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, Connection, PgConnection, Row};

/// Column names plus raw row values from one executed statement.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    /// Column names in result order
    pub columns: Vec<String>,

    /// One `Vec<Value>` per row, aligned with `columns`
    pub rows: Vec<Vec<Value>>,
}

/// Trait for the external query executor.
///
/// Accepts one statement string and returns column descriptors and row
/// values, or an execution error. Implementations must release any
/// connection they acquire on every exit path.
#[async_trait::async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Execute one statement and fetch all resulting rows.
    async fn fetch_rows(&self, statement: &str) -> AppResult<RowSet>;
}

/// Postgres executor opening one scoped connection per request.
///
/// No pooling at this layer: each call connects, fetches, and closes. The
/// connection is released on every exit path, explicitly on the normal
/// paths and by drop if anything unwinds.
pub struct PostgresExecutor {
    url: String,
}

impl PostgresExecutor {
    /// Create an executor for the given connection URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait::async_trait]
impl SqlExecutor for PostgresExecutor {
    async fn fetch_rows(&self, statement: &str) -> AppResult<RowSet> {
        let mut conn = PgConnection::connect(&self.url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect: {}", e)))?;

        let fetched = sqlx::query(statement).fetch_all(&mut conn).await;

        // Close before inspecting the outcome so the connection is released
        // on the failure path too.
        let _ = conn.close().await;

        let rows =
            fetched.map_err(|e| AppError::Database(format!("Query execution failed: {}", e)))?;

        let columns: Vec<String> = rows
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|column| column.name().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let decoded = rows
            .iter()
            .map(|row| {
                (0..row.columns().len())
                    .map(|idx| decode_column(row, idx))
                    .collect()
            })
            .collect();

        Ok(RowSet {
            columns,
            rows: decoded,
        })
    }
}

/// Decode one column of a dynamically-typed row into a JSON value.
///
/// Statements are model-generated, so column types are unknown at compile
/// time; each common Postgres type is tried in turn. A type outside this
/// list decodes to null rather than failing the whole row.
fn decode_column(row: &PgRow, idx: usize) -> Value {
    if let Ok(value) = row.try_get::<Option<String>, _>(idx) {
        return value.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(idx) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<i32>, _>(idx) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(idx) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<bool>, _>(idx) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<DateTime<Utc>>, _>(idx) {
        return value
            .map(|ts| Value::String(ts.to_rfc3339()))
            .unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<NaiveDateTime>, _>(idx) {
        return value
            .map(|ts| Value::String(ts.to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<NaiveDate>, _>(idx) {
        return value
            .map(|date| Value::String(date.to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<Value>, _>(idx) {
        return value.unwrap_or(Value::Null);
    }

    tracing::debug!(
        column = row.columns().get(idx).map(|c| c.name()).unwrap_or("?"),
        "Column type not representable; decoding as null"
    );
    Value::Null
}
