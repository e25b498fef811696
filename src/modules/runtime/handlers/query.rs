//! JSON query and execute handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use querygate_types::runtime::{ExecuteResponse, QueryRequest, QueryResponse};
use tracing::{debug, warn};

use super::{statement_from, status_for};
use crate::state::AppState;

/// Handler for JSON statement requests
pub struct QueryHandler;

impl QueryHandler {
    /// Handle POST /query
    pub async fn query(
        State(state): State<AppState>,
        body: Result<Json<QueryRequest>, JsonRejection>,
    ) -> impl IntoResponse {
        let result = match statement_from(body) {
            Ok(statement) => state.connector.query(&statement).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(result) => {
                debug!("Query returned {} rows", result.row_count());
                (StatusCode::OK, Json(QueryResponse::success(result)))
            }
            Err(e) => {
                warn!("Query request failed: {}", e);
                (status_for(&e), Json(QueryResponse::error(e.sanitized_message())))
            }
        }
    }

    /// Handle POST /execute
    pub async fn execute(
        State(state): State<AppState>,
        body: Result<Json<QueryRequest>, JsonRejection>,
    ) -> impl IntoResponse {
        let outcome = match statement_from(body) {
            Ok(statement) => state.connector.execute(&statement).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(outcome) => {
                debug!("Execute affected {} rows", outcome.rows_affected);
                (StatusCode::OK, Json(ExecuteResponse::success(outcome)))
            }
            Err(e) => {
                warn!("Execute request failed: {}", e);
                (status_for(&e), Json(ExecuteResponse::error(e.sanitized_message())))
            }
        }
    }
}
