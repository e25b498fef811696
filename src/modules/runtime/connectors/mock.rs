//! In-memory connector for router tests

use async_trait::async_trait;
use querygate_core::GatewayError;
use querygate_types::{ExecuteOutcome, Header, QueryResult};
use std::sync::atomic::{AtomicBool, Ordering};

use super::traits::Connector;

/// Answers every statement with a fixed two-row result; statements starting
/// with `FAIL` are rejected by the "engine".
pub(crate) struct MockConnector {
    pub closed: AtomicBool,
    pub supports_execute: bool,
}

impl MockConnector {
    pub fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
            supports_execute: true,
        }
    }

    pub fn read_only() -> Self {
        Self {
            supports_execute: false,
            ..Self::new()
        }
    }
}

#[async_trait]
impl Connector for MockConnector {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn query(&self, statement: &str) -> Result<QueryResult, GatewayError> {
        if statement.starts_with("FAIL") {
            return Err(GatewayError::statement(statement, "syntax error at or near \"FAIL\""));
        }
        Ok(QueryResult::new(
            vec![Header::new("id", "int4"), Header::new("name", "text")],
            vec![
                vec!["1".to_string(), "<a>".to_string()],
                vec!["2".to_string(), "b".to_string()],
            ],
            3,
        ))
    }

    async fn execute(&self, statement: &str) -> Result<ExecuteOutcome, GatewayError> {
        if !self.supports_execute {
            return Err(GatewayError::unsupported("mock", "execute"));
        }
        if statement.starts_with("FAIL") {
            return Err(GatewayError::statement(statement, "relation does not exist"));
        }
        Ok(ExecuteOutcome::new(4))
    }

    async fn close(&self) -> Result<(), GatewayError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
