//! Runtime type definitions for request/response handling

use serde::{Deserialize, Serialize};

use crate::result::{ExecuteOutcome, QueryResult};

/// Statement submission, shared by the HTML and JSON endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Raw statement text, passed to the connector verbatim
    #[serde(default)]
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Query execution response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Whether the query succeeded
    pub success: bool,
    /// Error message if the query failed
    #[serde(default)]
    pub error: String,
    /// Query result on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<QueryResult>,
}

impl QueryResponse {
    /// Create a successful response with a result
    pub fn success(result: QueryResult) -> Self {
        Self {
            success: true,
            error: String::new(),
            result: Some(result),
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            result: None,
        }
    }
}

/// Execute (mutation) response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResponse {
    /// Whether the statement succeeded
    pub success: bool,
    /// Error message if the statement failed
    #[serde(default)]
    pub error: String,
    /// Affected-row count on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ExecuteOutcome>,
}

impl ExecuteResponse {
    pub fn success(outcome: ExecuteOutcome) -> Self {
        Self {
            success: true,
            error: String::new(),
            outcome: Some(outcome),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            outcome: None,
        }
    }
}
