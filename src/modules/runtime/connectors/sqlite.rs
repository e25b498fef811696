//! SQLite connector implementation

use async_trait::async_trait;
use futures::TryStreamExt;
use querygate_core::{ConnectorConfig, GatewayError};
use querygate_types::{ExecuteOutcome, Header, QueryResult, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Either, Executor, Row, Statement, TypeInfo, ValueRef};
use std::str::FromStr;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::common::{
    closed, connect_error, dispatch_error, elapsed_ms, fetch_error, log_execute, log_query,
};
use super::traits::Connector;

const NAME: &str = "sqlite";

/// Path that selects a private in-memory database
pub const MEMORY_PATH: &str = ":memory:";

/// SQLite database connector
///
/// Cells are decoded by the storage class of the stored value, which in
/// SQLite can differ from the declared column type.
pub struct SqliteConnector {
    path: String,
    conn: Mutex<Option<SqliteConnection>>,
}

impl SqliteConnector {
    /// Open the database file named by `path`, or an in-memory database
    pub async fn new(config: &ConnectorConfig) -> Result<Self, GatewayError> {
        config.require(NAME, &["path"])?;
        let path = config.required("path")?.to_string();
        let create_if_missing = config.flag("createIfMissing", false)?;

        let options = if path == MEMORY_PATH {
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| connect_error(NAME, e))?
        } else {
            SqliteConnectOptions::new()
                .filename(&path)
                .create_if_missing(create_if_missing)
        };

        let conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| connect_error(NAME, e))?;
        info!("Opened sqlite database {}", path);

        Ok(Self {
            path,
            conn: Mutex::new(Some(conn)),
        })
    }

    async fn run_query(
        &self,
        statement: &str,
        start: Instant,
    ) -> Result<QueryResult, GatewayError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(|| closed(NAME))?;

        let prepared = (&mut *conn)
            .prepare(statement)
            .await
            .map_err(|e| dispatch_error(NAME, statement, e))?;

        // Describes the first statement only
        let headers: Vec<Header> = prepared
            .columns()
            .iter()
            .map(|c| Header::new(c.name(), c.type_info().name()))
            .collect();
        let width = headers.len();

        // sqlx runs every statement in the text and marks the end of each one
        // with a `Left`; anything after the first marker is a second statement.
        let mut rows = Vec::new();
        let mut finished = false;
        let mut cursor = prepared.query().fetch_many(&mut *conn);
        while let Some(item) = cursor.try_next().await.map_err(|e| {
            if finished {
                multiple_statements(statement)
            } else {
                fetch_error(NAME, statement, e, rows.len())
            }
        })? {
            if finished {
                return Err(multiple_statements(statement));
            }
            match item {
                Either::Left(_) => finished = true,
                Either::Right(row) => {
                    let cells = (0..width)
                        .map(|idx| Self::get_column_value(&row, idx).map(|v| v.render()))
                        .collect::<Result<Vec<String>, sqlx::Error>>()
                        .map_err(|e| fetch_error(NAME, statement, e, rows.len()))?;
                    rows.push(cells);
                }
            }
        }

        Ok(QueryResult::new(headers, rows, elapsed_ms(start)))
    }

    async fn run_execute(&self, statement: &str) -> Result<ExecuteOutcome, GatewayError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(|| closed(NAME))?;

        let done = (&mut *conn)
            .execute(statement)
            .await
            .map_err(|e| dispatch_error(NAME, statement, e))?;

        Ok(ExecuteOutcome::new(done.rows_affected()))
    }

    fn get_column_value(row: &SqliteRow, idx: usize) -> Result<Value, sqlx::Error> {
        let raw = row.try_get_raw(idx)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }

        let storage = raw.type_info();
        let value = match storage.name() {
            "INTEGER" => Value::Int(row.try_get_unchecked(idx)?),
            "REAL" => Value::Float(row.try_get_unchecked(idx)?),
            "BLOB" => Value::Bytes(row.try_get_unchecked(idx)?),
            // TEXT may hold bytes that are not valid UTF-8
            _ => match String::from_utf8(row.try_get_unchecked(idx)?) {
                Ok(text) => Value::Text(text),
                Err(e) => Value::Bytes(e.into_bytes()),
            },
        };

        Ok(value)
    }
}

fn multiple_statements(statement: &str) -> GatewayError {
    GatewayError::statement(statement, "query text must contain exactly one statement")
}

#[async_trait]
impl Connector for SqliteConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn query(&self, statement: &str) -> Result<QueryResult, GatewayError> {
        let start = Instant::now();
        let result = self.run_query(statement, start).await;
        log_query(NAME, statement, start, &result);
        result
    }

    async fn execute(&self, statement: &str) -> Result<ExecuteOutcome, GatewayError> {
        let start = Instant::now();
        let result = self.run_execute(statement).await;
        log_execute(NAME, statement, start, &result);
        result
    }

    async fn close(&self) -> Result<(), GatewayError> {
        let conn = self.conn.lock().await.take();
        if let Some(conn) = conn {
            conn.close().await.map_err(|e| {
                GatewayError::connection(format!("Failed to close sqlite database: {}", e))
            })?;
            debug!("Closed sqlite database {}", self.path);
        }
        Ok(())
    }
}
