//! Normalized result shapes produced by every connector

use serde::{Deserialize, Serialize};

/// One row of a query result: one rendered cell per header
pub type Row = Vec<String>;

/// Description of one output column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Column name as reported by the engine
    pub name: String,

    /// Engine-native type name (not normalized across backends)
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Header {
    /// Create a new header
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Fully materialized outcome of a read statement
///
/// Every row holds exactly `headers.len()` cells and rows keep the order in
/// which the engine's cursor emitted them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Ordered column descriptions
    pub headers: Vec<Header>,

    /// Ordered rows of rendered cells
    pub rows: Vec<Row>,

    /// Elapsed wall-clock time of the statement in milliseconds
    pub duration_ms: u64,
}

impl QueryResult {
    /// Create a query result from headers, rows and a duration
    pub fn new(headers: Vec<Header>, rows: Vec<Row>, duration_ms: u64) -> Self {
        Self {
            headers,
            rows,
            duration_ms,
        }
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns true if every row has exactly one cell per header
    pub fn is_rectangular(&self) -> bool {
        let width = self.headers.len();
        self.rows.iter().all(|row| row.len() == width)
    }

    /// Header names in column order
    pub fn column_names(&self) -> Vec<&str> {
        self.headers.iter().map(|h| h.name.as_str()).collect()
    }
}

/// Outcome of a mutating statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteOutcome {
    /// Number of rows the engine reported as affected
    pub rows_affected: u64,
}

impl ExecuteOutcome {
    pub fn new(rows_affected: u64) -> Self {
        Self { rows_affected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueryResult {
        QueryResult::new(
            vec![Header::new("id", "int4"), Header::new("name", "text")],
            vec![
                vec!["1".to_string(), "a".to_string()],
                vec!["2".to_string(), "b".to_string()],
            ],
            3,
        )
    }

    #[test]
    fn test_query_result_accessors() {
        let result = sample();
        assert_eq!(result.column_count(), 2);
        assert_eq!(result.row_count(), 2);
        assert!(!result.is_empty());
        assert!(result.is_rectangular());
        assert_eq!(result.column_names(), vec!["id", "name"]);
    }

    #[test]
    fn test_query_result_ragged_rows_detected() {
        let mut result = sample();
        result.rows.push(vec!["3".to_string()]);
        assert!(!result.is_rectangular());
    }

    #[test]
    fn test_query_result_serde_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["headers"][0]["name"], "id");
        assert_eq!(json["headers"][0]["type"], "int4");
        assert_eq!(json["rows"][1][1], "b");
        assert_eq!(json["durationMs"], 3);

        let parsed: QueryResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_execute_outcome_serde_shape() {
        let json = serde_json::to_string(&ExecuteOutcome::new(4)).unwrap();
        assert_eq!(json, r#"{"rowsAffected":4}"#);
    }
}
