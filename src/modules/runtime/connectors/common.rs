//! Error mapping, timing and diagnostics shared by the sqlx connectors

use querygate_core::GatewayError;
use querygate_types::{ExecuteOutcome, QueryResult};
use std::time::Instant;
use tracing::{error, info};

/// Milliseconds elapsed since `start`
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Error returned by calls made after `close`
pub(crate) fn closed(connector: &str) -> GatewayError {
    GatewayError::connection(format!("{} connector is closed", connector))
}

/// True for failures of the transport rather than of the statement
fn is_connection_failure(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

/// Engine message, with the SQLSTATE/error code when the engine sent one
fn engine_message(err: &sqlx::Error) -> String {
    match err.as_database_error() {
        Some(db) => match db.code() {
            Some(code) => format!("{} (code {})", db.message(), code),
            None => db.message().to_string(),
        },
        None => err.to_string(),
    }
}

/// Map a failure to open a connection
pub(crate) fn connect_error(connector: &str, err: sqlx::Error) -> GatewayError {
    match err {
        sqlx::Error::Configuration(e) => GatewayError::configuration(format!(
            "{} connection parameters rejected: {}",
            connector, e
        )),
        other => GatewayError::connection(format!(
            "{} connection failed: {}",
            connector,
            engine_message(&other)
        )),
    }
}

/// Map a failure while sending the statement to the engine
pub(crate) fn dispatch_error(connector: &str, statement: &str, err: sqlx::Error) -> GatewayError {
    if is_connection_failure(&err) {
        GatewayError::connection(format!("{} connection lost: {}", connector, err))
    } else {
        GatewayError::statement(statement, engine_message(&err))
    }
}

/// Map a failure while reading rows, after `rows_read` rows were received
///
/// An engine error before the first row is the engine refusing to run the
/// statement; anything after that, or any decode failure, is a cursor read
/// failure.
pub(crate) fn fetch_error(
    connector: &str,
    statement: &str,
    err: sqlx::Error,
    rows_read: usize,
) -> GatewayError {
    if is_connection_failure(&err) {
        GatewayError::connection(format!("{} connection lost: {}", connector, err))
    } else if matches!(err, sqlx::Error::Database(_)) && rows_read == 0 {
        GatewayError::statement(statement, engine_message(&err))
    } else {
        GatewayError::cursor_read(
            statement,
            format!("after {} rows: {}", rows_read, engine_message(&err)),
        )
    }
}

/// Log the statement and its duration whichever way the query ended
pub(crate) fn log_query(
    connector: &str,
    statement: &str,
    start: Instant,
    result: &Result<QueryResult, GatewayError>,
) {
    match result {
        Ok(r) => info!(
            "[{}] \"{}\" took {} milliseconds ({} rows)",
            connector,
            statement,
            r.duration_ms,
            r.row_count()
        ),
        Err(e) => error!(
            "[{}] error for \"{}\" after {} milliseconds: {}",
            connector,
            statement,
            elapsed_ms(start),
            e
        ),
    }
}

/// Log a mutating statement and its duration whichever way it ended
pub(crate) fn log_execute(
    connector: &str,
    statement: &str,
    start: Instant,
    result: &Result<ExecuteOutcome, GatewayError>,
) {
    match result {
        Ok(outcome) => info!(
            "[{}] \"{}\" took {} milliseconds ({} rows affected)",
            connector,
            statement,
            elapsed_ms(start),
            outcome.rows_affected
        ),
        Err(e) => error!(
            "[{}] error for \"{}\" after {} milliseconds: {}",
            connector,
            statement,
            elapsed_ms(start),
            e
        ),
    }
}
