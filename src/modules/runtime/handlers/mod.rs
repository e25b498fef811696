//! HTTP request handlers for the querygate server
//!
//! This module contains the HTML search handlers and the JSON
//! query/execute handlers.

mod query;
mod search;

pub use query::QueryHandler;
pub use search::SearchHandler;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use querygate_core::GatewayError;
use querygate_types::runtime::QueryRequest;

/// Unwrap a JSON body into statement text, rejecting malformed bodies and
/// blank statements
pub(crate) fn statement_from(
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<String, GatewayError> {
    let Json(request) =
        body.map_err(|e| GatewayError::InputValidation(format!("Invalid request body: {}", e)))?;
    if request.query.trim().is_empty() {
        return Err(GatewayError::InputValidation(
            "query must not be empty".to_string(),
        ));
    }
    Ok(request.query)
}

/// HTTP status for an error
pub(crate) fn status_for(err: &GatewayError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
