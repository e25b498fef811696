//! Type definitions for querygate
//!
//! This crate contains the shapes every connector produces: the connector
//! kind, the tabular query result, the execute outcome, the typed cell value
//! with its canonical string rendering, and the HTTP request/response types.

pub mod connector;
pub mod result;
pub mod runtime;
pub mod value;

pub use connector::ConnectorKind;
pub use result::{ExecuteOutcome, Header, QueryResult, Row};
pub use value::Value;
