//! MySQL connector implementation

use async_trait::async_trait;
use futures::TryStreamExt;
use querygate_core::{ConnectorConfig, GatewayError};
use querygate_types::{ExecuteOutcome, Header, QueryResult, Value};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow, MySqlSslMode};
use sqlx::{Column, Connection, Executor, Row, Statement, TypeInfo, ValueRef};
use std::str::FromStr;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::common::{
    closed, connect_error, dispatch_error, elapsed_ms, fetch_error, log_execute, log_query,
};
use super::traits::Connector;

const NAME: &str = "mysql";

/// Configuration keys the MySQL connector requires
pub const REQUIRED_KEYS: &[&str] = &["host", "port", "databaseName", "user", "password"];

/// MySQL database connector
pub struct MySqlConnector {
    host: String,
    port: u16,
    database_name: String,
    user: String,
    options: MySqlConnectOptions,
    conn: Mutex<Option<MySqlConnection>>,
}

impl MySqlConnector {
    /// Validate the configuration and open a connection
    pub async fn new(config: &ConnectorConfig) -> Result<Self, GatewayError> {
        let mut connector = Self::from_config(config)?;

        let conn = MySqlConnection::connect_with(&connector.options)
            .await
            .map_err(|e| connect_error(NAME, e))?;
        info!("Connected to {}", connector.descriptor());

        connector.conn = Mutex::new(Some(conn));
        Ok(connector)
    }

    fn from_config(config: &ConnectorConfig) -> Result<Self, GatewayError> {
        config.require(NAME, REQUIRED_KEYS)?;

        let host = config.required("host")?.to_string();
        let port_text = config.required("port")?;
        let port: u16 = port_text.trim().parse().map_err(|_| {
            GatewayError::configuration(format!(
                "mysql port must be a number between 0 and 65535, got '{}'",
                port_text
            ))
        })?;
        let database_name = config.required("databaseName")?.to_string();
        let user = config.required("user")?.to_string();
        let password = config.required("password")?;

        let mut options = MySqlConnectOptions::new()
            .host(&host)
            .port(port)
            .database(&database_name)
            .username(&user)
            .password(password);

        if let Some(mode) = config.optional("sslMode") {
            let ssl_mode = MySqlSslMode::from_str(mode).map_err(|_| {
                GatewayError::configuration(format!(
                    "mysql sslMode must be one of disabled, preferred, required, \
                     verify_ca, verify_identity; got '{}'",
                    mode
                ))
            })?;
            options = options.ssl_mode(ssl_mode);
        }

        Ok(Self {
            host,
            port,
            database_name,
            user,
            options,
            conn: Mutex::new(None),
        })
    }

    /// Connection descriptor without credentials
    pub fn descriptor(&self) -> String {
        format!(
            "mysql://{}@{}:{}/{}",
            self.user, self.host, self.port, self.database_name
        )
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

        let headers: Vec<Header> = prepared
            .columns()
            .iter()
            .map(|c| Header::new(c.name(), c.type_info().name()))
            .collect();
        let width = headers.len();

        let mut rows = Vec::new();
        let mut cursor = prepared.query().fetch(&mut *conn);
        while let Some(row) = cursor
            .try_next()
            .await
            .map_err(|e| fetch_error(NAME, statement, e, rows.len()))?
        {
            let cells = (0..width)
                .map(|idx| Self::get_column_value(&row, idx).map(|v| v.render()))
                .collect::<Result<Vec<String>, sqlx::Error>>()
                .map_err(|e| fetch_error(NAME, statement, e, rows.len()))?;
            rows.push(cells);
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

    /// Decode one column into a typed value
    fn get_column_value(row: &MySqlRow, idx: usize) -> Result<Value, sqlx::Error> {
        if row.try_get_raw(idx)?.is_null() {
            return Ok(Value::Null);
        }

        let column = row.columns().get(idx).ok_or(sqlx::Error::ColumnIndexOutOfBounds {
            index: idx,
            len: row.len(),
        })?;

        let value = match column.type_info().name() {
            "BOOLEAN" => Value::Bool(row.try_get(idx)?),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
                Value::Int(row.try_get_unchecked(idx)?)
            }
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
            | "BIGINT UNSIGNED" => Value::UInt(row.try_get_unchecked(idx)?),
            "YEAR" => Value::UInt(row.try_get_unchecked::<u16, _>(idx)?.into()),
            "FLOAT" => Value::Float32(row.try_get(idx)?),
            "DOUBLE" => Value::Float(row.try_get(idx)?),
            "DECIMAL" => Value::Decimal(row.try_get_unchecked(idx)?),
            "DATETIME" | "TIMESTAMP" => {
                Value::DateTime(row.try_get::<chrono::NaiveDateTime, _>(idx)?)
            }
            "DATE" => Value::Date(row.try_get::<chrono::NaiveDate, _>(idx)?),
            "TIME" => {
                let raw: Vec<u8> = row.try_get_unchecked(idx)?;
                match decode_time(&raw) {
                    Some(interval) => Value::Interval(interval),
                    None => Value::from_unknown_bytes(raw),
                }
            }
            "JSON" => Value::Json(row.try_get(idx)?),
            "CHAR" | "VARCHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
            | "SET" => Value::Text(row.try_get_unchecked(idx)?),
            "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
            | "GEOMETRY" => Value::Bytes(row.try_get_unchecked(idx)?),
            other => {
                debug!("Reading mysql type {} as raw payload", other);
                Value::from_unknown_bytes(row.try_get_unchecked(idx)?)
            }
        };

        Ok(value)
    }
}

/// Decode a binary-protocol TIME value.
///
/// TIME is a signed duration up to 838:59:59, not a time of day. Layout:
/// length (0, 8 or 12), is-negative flag, days (u32 LE), hours, minutes,
/// seconds, then microseconds (u32 LE) when the length is 12. Returns `None`
/// for anything else, such as the text-protocol form.
fn decode_time(buf: &[u8]) -> Option<chrono::Duration> {
    let (&len, body) = buf.split_first()?;
    if body.len() != len as usize {
        return None;
    }
    match len {
        0 => Some(chrono::Duration::zero()),
        8 | 12 => {
            let negative = body[0] != 0;
            let days = u32::from_le_bytes([body[1], body[2], body[3], body[4]]) as i64;
            let (hours, minutes, seconds) = (body[5] as i64, body[6] as i64, body[7] as i64);
            let micros = if len == 12 {
                u32::from_le_bytes([body[8], body[9], body[10], body[11]]) as i64
            } else {
                0
            };

            let total = ((days * 24 + hours) * 3600 + minutes * 60 + seconds) * 1_000_000 + micros;
            let duration = chrono::Duration::microseconds(total);
            Some(if negative { -duration } else { duration })
        }
        _ => None,
    }
}

#[async_trait]
impl Connector for MySqlConnector {
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
                GatewayError::connection(format!("Failed to close mysql connection: {}", e))
            })?;
            debug!("Closed {}", self.descriptor());
        }
        Ok(())
    }
}
