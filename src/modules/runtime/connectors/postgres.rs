//! PostgreSQL connector implementation

use async_trait::async_trait;
use futures::TryStreamExt;
use querygate_core::{ConnectorConfig, GatewayError};
use querygate_types::{ExecuteOutcome, Header, QueryResult, Value};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow, PgSslMode};
use sqlx::{Column, Connection, Executor, Row, Statement, TypeInfo, ValueRef};
use std::fmt::Write;
use std::str::FromStr;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::common::{
    closed, connect_error, dispatch_error, elapsed_ms, fetch_error, log_query,
};
use super::traits::Connector;

const NAME: &str = "postgres";

/// Configuration keys the PostgreSQL connector requires
pub const REQUIRED_KEYS: &[&str] = &[
    "host",
    "port",
    "databaseName",
    "user",
    "password",
    "sslMode",
];

/// PostgreSQL database connector
///
/// Holds one `PgConnection` behind an async mutex. Mutation is not wired up
/// for this backend: `execute` always fails with an unsupported-operation
/// error.
pub struct PostgresConnector {
    host: String,
    port: u16,
    database_name: String,
    user: String,
    ssl_mode: String,
    options: PgConnectOptions,
    conn: Mutex<Option<PgConnection>>,
}

impl PostgresConnector {
    /// Validate the configuration and open a connection
    pub async fn new(config: &ConnectorConfig) -> Result<Self, GatewayError> {
        let mut connector = Self::from_config(config)?;

        let conn = PgConnection::connect_with(&connector.options)
            .await
            .map_err(|e| connect_error(NAME, e))?;
        info!("Connected to {}", connector.descriptor());

        connector.conn = Mutex::new(Some(conn));
        Ok(connector)
    }

    /// Validate the configuration and build the connection options without
    /// connecting
    fn from_config(config: &ConnectorConfig) -> Result<Self, GatewayError> {
        config.require(NAME, REQUIRED_KEYS)?;

        let host = config.required("host")?.to_string();
        let port_text = config.required("port")?;
        let port: u16 = port_text.trim().parse().map_err(|_| {
            GatewayError::configuration(format!(
                "postgres port must be a number between 0 and 65535, got '{}'",
                port_text
            ))
        })?;
        let database_name = config.required("databaseName")?.to_string();
        let user = config.required("user")?.to_string();
        let password = config.required("password")?;
        let ssl_mode = config.required("sslMode")?.to_string();
        let pg_ssl_mode = PgSslMode::from_str(&ssl_mode).map_err(|_| {
            GatewayError::configuration(format!(
                "postgres sslMode must be one of disable, allow, prefer, require, \
                 verify-ca, verify-full; got '{}'",
                ssl_mode
            ))
        })?;

        let options = PgConnectOptions::new()
            .host(&host)
            .port(port)
            .database(&database_name)
            .username(&user)
            .password(password)
            .ssl_mode(pg_ssl_mode);

        Ok(Self {
            host,
            port,
            database_name,
            user,
            ssl_mode,
            options,
            conn: Mutex::new(None),
        })
    }

    /// Connection descriptor without credentials, for diagnostics
    pub fn descriptor(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} sslmode={}",
            self.host, self.port, self.database_name, self.user, self.ssl_mode
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
            .map(|c| Header::new(c.name(), catalog_type_name(c.type_info().name())))
            .collect();
        let width = headers.len();

        let mut rows = Vec::new();
        let mut cursor = prepared.query().fetch(&mut *conn);
        while let Some(row) = cursor
            .try_next()
            .await
            .map_err(|e| fetch_error(NAME, statement, e, rows.len()))?
        {
            let cells = Self::row_to_cells(&row, width)
                .map_err(|e| fetch_error(NAME, statement, e, rows.len()))?;
            rows.push(cells);
        }

        Ok(QueryResult::new(headers, rows, elapsed_ms(start)))
    }

    /// Render one row, one cell per result column
    fn row_to_cells(row: &PgRow, width: usize) -> Result<Vec<String>, sqlx::Error> {
        (0..width)
            .map(|idx| Self::get_column_value(row, idx).map(|v| v.render()))
            .collect()
    }

    /// Decode one column into a typed value
    fn get_column_value(row: &PgRow, idx: usize) -> Result<Value, sqlx::Error> {
        if row.try_get_raw(idx)?.is_null() {
            return Ok(Value::Null);
        }

        let column = row.columns().get(idx).ok_or(sqlx::Error::ColumnIndexOutOfBounds {
            index: idx,
            len: row.len(),
        })?;

        let value = match column.type_info().name() {
            "BOOL" => Value::Bool(row.try_get(idx)?),
            "INT2" => Value::Int(row.try_get::<i16, _>(idx)?.into()),
            "INT4" => Value::Int(row.try_get::<i32, _>(idx)?.into()),
            "INT8" => Value::Int(row.try_get(idx)?),
            "OID" => Value::UInt(row.try_get::<sqlx::postgres::types::Oid, _>(idx)?.0.into()),
            "FLOAT4" => Value::Float32(row.try_get(idx)?),
            "FLOAT8" => Value::Float(row.try_get(idx)?),
            "NUMERIC" => {
                let bytes: Vec<u8> = row.try_get_unchecked(idx)?;
                match render_numeric(&bytes) {
                    Some(text) => Value::Decimal(text),
                    None => Value::Bytes(bytes),
                }
            }
            "TEXT" | "VARCHAR" | "CHAR" | "NAME" | "UNKNOWN" => {
                Value::Text(row.try_get_unchecked(idx)?)
            }
            "BYTEA" => Value::Bytes(row.try_get(idx)?),
            "UUID" => Value::Uuid(row.try_get::<uuid::Uuid, _>(idx)?),
            "JSON" | "JSONB" => Value::Json(row.try_get(idx)?),
            "TIMESTAMPTZ" => {
                Value::Timestamp(row.try_get::<chrono::DateTime<chrono::Utc>, _>(idx)?)
            }
            "TIMESTAMP" => Value::DateTime(row.try_get::<chrono::NaiveDateTime, _>(idx)?),
            "DATE" => Value::Date(row.try_get::<chrono::NaiveDate, _>(idx)?),
            "TIME" => Value::Time(row.try_get::<chrono::NaiveTime, _>(idx)?),
            other => {
                debug!("Reading postgres type {} as raw payload", other);
                Value::from_unknown_bytes(row.try_get_unchecked(idx)?)
            }
        };

        Ok(value)
    }
}

/// Map sqlx's display name for a type back to its `pg_type.typname`.
///
/// sqlx uppercases names, shows `bpchar` as `CHAR` and the single-byte
/// `"char"` as `"CHAR"`, and writes arrays as `ELEM[]` where the catalog
/// uses `_elem`.
fn catalog_type_name(display: &str) -> String {
    if let Some(element) = display.strip_suffix("[]") {
        return format!("_{}", catalog_type_name(element));
    }
    match display {
        "CHAR" => "bpchar".to_string(),
        "\"CHAR\"" => "char".to_string(),
        other => other.to_lowercase(),
    }
}

/// Render a NUMERIC from its binary wire format as exact decimal text.
///
/// Layout: ndigits, weight, sign, dscale (all 16-bit big-endian), then
/// `ndigits` base-10000 digits. The value is the sum of
/// `digit[i] * 10000^(weight - i)`, printed with `dscale` fractional digits.
fn render_numeric(buf: &[u8]) -> Option<String> {
    if buf.len() < 8 {
        return None;
    }
    let read = |at: usize| u16::from_be_bytes([buf[at], buf[at + 1]]);

    let ndigits = read(0) as usize;
    let weight = read(2) as i16 as i32;
    let sign = read(4);
    let dscale = read(6) as usize;

    match sign {
        0x0000 | 0x4000 => {}
        0xC000 => return Some("NaN".to_string()),
        0xD000 => return Some("Infinity".to_string()),
        0xF000 => return Some("-Infinity".to_string()),
        _ => return None,
    }
    if buf.len() < 8 + ndigits * 2 {
        return None;
    }

    let digits: Vec<u16> = (0..ndigits).map(|i| read(8 + i * 2)).collect();
    let digit_at = |pos: i32| -> u16 {
        if pos < 0 {
            0
        } else {
            digits.get(pos as usize).copied().unwrap_or(0)
        }
    };

    let mut out = String::new();
    if sign == 0x4000 {
        out.push('-');
    }

    if weight < 0 {
        out.push('0');
    } else {
        for pos in 0..=weight {
            if pos == 0 {
                let _ = write!(out, "{}", digit_at(pos));
            } else {
                let _ = write!(out, "{:04}", digit_at(pos));
            }
        }
    }

    if dscale > 0 {
        let mut fraction = String::with_capacity(dscale + 4);
        let mut pos = weight + 1;
        while fraction.len() < dscale {
            let _ = write!(fraction, "{:04}", digit_at(pos));
            pos += 1;
        }
        fraction.truncate(dscale);
        out.push('.');
        out.push_str(&fraction);
    }

    Some(out)
}

#[async_trait]
impl Connector for PostgresConnector {
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
        warn!(
            "[{}] rejected \"{}\": execute is not implemented for this connector",
            NAME, statement
        );
        Err(GatewayError::unsupported(NAME, "execute"))
    }

    async fn close(&self) -> Result<(), GatewayError> {
        let conn = self.conn.lock().await.take();
        if let Some(conn) = conn {
            conn.close().await.map_err(|e| {
                GatewayError::connection(format!("Failed to close postgres connection: {}", e))
            })?;
            debug!("Closed {}", self.descriptor());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querygate_core::ErrorKind;

    fn config() -> ConnectorConfig {
        ConnectorConfig::new()
            .with("type", "postgres")
            .with("host", "localhost")
            .with("port", "5432")
            .with("databaseName", "testdb")
            .with("user", "u")
            .with("password", "p")
            .with("sslMode", "disable")
    }

    /// Settings for a live server, from QUERYGATE_TEST_PG_* variables
    fn live_config() -> ConnectorConfig {
        let var = |name: &str, default: &str| {
            std::env::var(format!("QUERYGATE_TEST_PG_{}", name))
                .unwrap_or_else(|_| default.to_string())
        };
        ConnectorConfig::new()
            .with("type", "postgres")
            .with("host", var("HOST", "localhost"))
            .with("port", var("PORT", "5432"))
            .with("databaseName", var("DATABASE", "testdb"))
            .with("user", var("USER", "u"))
            .with("password", var("PASSWORD", "p"))
            .with("sslMode", var("SSLMODE", "disable"))
    }

    fn numeric(weight: i16, sign: u16, dscale: u16, digits: &[u16]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(digits.len() as u16).to_be_bytes());
        buf.extend_from_slice(&weight.to_be_bytes());
        buf.extend_from_slice(&sign.to_be_bytes());
        buf.extend_from_slice(&dscale.to_be_bytes());
        for d in digits {
            buf.extend_from_slice(&d.to_be_bytes());
        }
        buf
    }

    #[test]
    fn test_from_config_builds_descriptor_without_password() {
        let connector = PostgresConnector::from_config(&config()).unwrap();
        let descriptor = connector.descriptor();
        assert_eq!(
            descriptor,
            "host=localhost port=5432 dbname=testdb user=u sslmode=disable"
        );
        assert!(!descriptor.contains("password"));
    }

    #[test]
    fn test_from_config_missing_key() {
        for key in REQUIRED_KEYS {
            let mut cfg = config();
            cfg.insert(*key, "");
            let err = PostgresConnector::from_config(&cfg).err().unwrap();
            assert_eq!(err.kind(), ErrorKind::Configuration);
            assert!(err.to_string().contains(key));
        }
    }

    #[test]
    fn test_from_config_invalid_port_and_ssl_mode() {
        let err = PostgresConnector::from_config(&config().with("port", "fifty"))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = PostgresConnector::from_config(&config().with("sslMode", "sometimes"))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_new_fails_fast_on_missing_key() {
        let mut cfg = config();
        cfg.insert("host", "");
        let err = PostgresConnector::new(&cfg).await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_execute_is_unsupported() {
        let connector = PostgresConnector::from_config(&config()).unwrap();
        let err = connector.execute("DELETE FROM t").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[tokio::test]
    async fn test_query_without_connection_is_connection_error() {
        let connector = PostgresConnector::from_config(&config()).unwrap();
        let err = connector.query("SELECT 1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(connector.close().await.is_ok());
    }

    #[test]
    fn test_catalog_type_name() {
        assert_eq!(catalog_type_name("INT4"), "int4");
        assert_eq!(catalog_type_name("TEXT"), "text");
        assert_eq!(catalog_type_name("TIMESTAMPTZ"), "timestamptz");
        assert_eq!(catalog_type_name("CHAR"), "bpchar");
        assert_eq!(catalog_type_name("\"CHAR\""), "char");
        assert_eq!(catalog_type_name("INT4[]"), "_int4");
        assert_eq!(catalog_type_name("CHAR[]"), "_bpchar");
    }

    #[test]
    fn test_render_numeric() {
        assert_eq!(render_numeric(&numeric(0, 0, 1, &[1, 5000])).unwrap(), "1.5");
        assert_eq!(
            render_numeric(&numeric(1, 0, 3, &[1, 2345, 6780])).unwrap(),
            "12345.678"
        );
        assert_eq!(render_numeric(&numeric(-1, 0, 3, &[10])).unwrap(), "0.001");
        assert_eq!(render_numeric(&numeric(-2, 0, 6, &[1200])).unwrap(), "0.000012");
        assert_eq!(render_numeric(&numeric(1, 0, 0, &[1])).unwrap(), "10000");
        assert_eq!(render_numeric(&numeric(0, 0x4000, 2, &[42, 5000])).unwrap(), "-42.50");
        assert_eq!(render_numeric(&numeric(0, 0, 0, &[])).unwrap(), "0");
        assert_eq!(render_numeric(&numeric(0, 0xC000, 0, &[])).unwrap(), "NaN");
        assert!(render_numeric(&[0, 1]).is_none());
        assert!(render_numeric(&numeric(0, 0, 0, &[1])[..9]).is_none());
    }

    #[tokio::test]
    #[ignore] // Requires a running PostgreSQL instance
    async fn test_postgres_example_scenario() {
        let connector = PostgresConnector::new(&live_config()).await.unwrap();
        let _ = connector.query("DROP TABLE IF EXISTS querygate_t").await;
        connector
            .query("CREATE TABLE querygate_t(id int, name text)")
            .await
            .unwrap();
        connector
            .query("INSERT INTO querygate_t VALUES (1, 'a'), (2, 'b')")
            .await
            .unwrap();

        let result = connector
            .query("SELECT id, name FROM querygate_t ORDER BY id")
            .await
            .unwrap();
        assert_eq!(
            result.headers,
            vec![Header::new("id", "int4"), Header::new("name", "text")]
        );
        assert_eq!(
            result.rows,
            vec![
                vec!["1".to_string(), "a".to_string()],
                vec!["2".to_string(), "b".to_string()],
            ]
        );

        let again = connector
            .query("SELECT id, name FROM querygate_t ORDER BY id")
            .await
            .unwrap();
        assert_eq!(again.headers, result.headers);
        assert_eq!(again.rows, result.rows);

        connector.query("DROP TABLE querygate_t").await.unwrap();
        connector.close().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a running PostgreSQL instance
    async fn test_postgres_rendering_and_errors() {
        let connector = PostgresConnector::new(&live_config()).await.unwrap();

        let result = connector
            .query("SELECT 1.50::numeric AS n, NULL::text AS z, true AS b, '\\xdead'::bytea AS raw")
            .await
            .unwrap();
        assert_eq!(result.rows, vec![vec!["1.50", "NULL", "true", "\\xdead"]]);

        let err = connector.query("SELEKT 1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Statement);

        // The connector stays usable after a rejected statement
        assert!(connector.query("SELECT 1").await.is_ok());

        let slow = connector.query("SELECT pg_sleep(0.05)").await.unwrap();
        assert!(slow.duration_ms >= 50);

        connector.close().await.unwrap();
    }
}
