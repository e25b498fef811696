//! Error types for querygate

use thiserror::Error;

/// Coarse classification of a [`GatewayError`], used by callers to decide
/// whether to retry, surface the message verbatim, or report a missing feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required configuration missing, empty or malformed
    Configuration,
    /// Engine unreachable, credentials rejected, or connection lost
    Connection,
    /// Engine rejected or failed to execute the statement
    Statement,
    /// Failure while materializing rows after a successful dispatch
    CursorRead,
    /// The connector does not implement the requested operation
    Unsupported,
    /// Bad input at the transport layer
    Input,
    /// Everything else (I/O, serialization, server)
    Internal,
}

/// Main error type for querygate operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Required configuration key missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement rejected by the engine
    #[error("Statement failed: {message} (statement: {statement})")]
    Statement { statement: String, message: String },

    /// Row materialization failed after dispatch
    #[error("Cursor read failed: {message} (statement: {statement})")]
    CursorRead { statement: String, message: String },

    /// Operation not implemented by this connector
    #[error("Operation '{operation}' is not supported by the {connector} connector")]
    Unsupported {
        connector: String,
        operation: &'static str,
    },

    /// Environment variable referenced by a config placeholder is not set
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    /// Input validation error (HTTP layer)
    #[error("Input validation error: {0}")]
    InputValidation(String),

    /// HTML template error
    #[error("Template error: {0}")]
    Template(String),

    /// HTTP server error
    #[error("Server error: {0}")]
    Server(String),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a statement error carrying the offending statement
    pub fn statement(statement: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Statement {
            statement: statement.into(),
            message: message.into(),
        }
    }

    /// Create a cursor read error carrying the offending statement
    pub fn cursor_read(statement: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CursorRead {
            statement: statement.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-operation error
    pub fn unsupported(connector: impl Into<String>, operation: &'static str) -> Self {
        Self::Unsupported {
            connector: connector.into(),
            operation,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Configuration(_) | GatewayError::EnvVarNotFound(_) => {
                ErrorKind::Configuration
            }
            GatewayError::Connection(_) => ErrorKind::Connection,
            GatewayError::Statement { .. } => ErrorKind::Statement,
            GatewayError::CursorRead { .. } => ErrorKind::CursorRead,
            GatewayError::Unsupported { .. } => ErrorKind::Unsupported,
            GatewayError::InputValidation(_) => ErrorKind::Input,
            GatewayError::Template(_)
            | GatewayError::Server(_)
            | GatewayError::Io(_)
            | GatewayError::Json(_) => ErrorKind::Internal,
        }
    }

    /// Returns true if the caller may reasonably retry the same call.
    ///
    /// The gateway itself never retries.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }

    /// Returns the appropriate HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Input => 400,
            ErrorKind::Statement => 422,
            ErrorKind::Unsupported => 501,
            ErrorKind::Connection => 502,
            ErrorKind::Configuration | ErrorKind::CursorRead | ErrorKind::Internal => 500,
        }
    }

    /// Sanitize the error message to avoid leaking sensitive information
    pub fn sanitized_message(&self) -> String {
        match self {
            // Don't expose connection details
            GatewayError::Connection(_) => "Database connection error".to_string(),
            GatewayError::Configuration(_) | GatewayError::EnvVarNotFound(_) => {
                "Gateway is misconfigured".to_string()
            }
            GatewayError::Io(_) | GatewayError::Server(_) | GatewayError::Template(_) => {
                "Internal server error".to_string()
            }

            // The engine message is what the caller needs to fix the statement
            GatewayError::Statement { message, .. } => message.clone(),
            GatewayError::CursorRead { message, .. } => {
                format!("Failed to read results: {}", message)
            }

            _ => self.to_string(),
        }
    }
}

/// Result type alias using GatewayError
pub type Result<T> = std::result::Result<T, GatewayError>;
