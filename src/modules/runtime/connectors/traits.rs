//! Connector trait definition

use async_trait::async_trait;
use querygate_core::GatewayError;
use querygate_types::{ExecuteOutcome, QueryResult};

/// Trait for database connectors
///
/// All connectors implement this trait so callers can query and mutate any
/// backend through one shape. A connector owns exactly one live connection,
/// established at construction. Calls on one instance are serialized: a
/// single statement is in flight at a time and concurrent callers wait their
/// turn. Nothing is retried, cached or cancelled.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Stable backend identifier, e.g. `postgres`
    fn name(&self) -> &'static str;

    /// Execute a read statement and return the fully materialized result
    ///
    /// The statement text is sent to the engine verbatim. Rows read before a
    /// failure are discarded; a failed call never returns a partial result.
    async fn query(&self, statement: &str) -> Result<QueryResult, GatewayError>;

    /// Execute a mutating statement and return the affected-row count
    ///
    /// Connectors without mutation support fail with
    /// [`GatewayError::Unsupported`].
    async fn execute(&self, statement: &str) -> Result<ExecuteOutcome, GatewayError>;

    /// Close the connection and release resources
    ///
    /// Idempotent. Later `query`/`execute` calls fail with a connection error.
    async fn close(&self) -> Result<(), GatewayError>;
}
