//! HTML search page handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};
use querygate_types::runtime::QueryRequest;
use tracing::debug;

use super::statement_from;
use crate::render::{error_fragment, render_results};
use crate::state::AppState;

/// Handler for the search page and its results fragment
pub struct SearchHandler;

impl SearchHandler {
    /// Handle GET /search.html
    pub async fn page(State(state): State<AppState>) -> Html<String> {
        Html(state.templates.search.clone())
    }

    /// Handle POST /search_results.html
    ///
    /// Always answers 200: failures render as an error fragment the page
    /// swaps in place of the table.
    pub async fn results(
        State(state): State<AppState>,
        body: Result<Json<QueryRequest>, JsonRejection>,
    ) -> Html<String> {
        let statement = match statement_from(body) {
            Ok(statement) => statement,
            Err(e) => return Html(error_fragment(&e.to_string())),
        };

        match state.connector.query(&statement).await {
            Ok(result) => {
                debug!("Rendering {} rows", result.row_count());
                Html(render_results(&state.templates.search_results, &result))
            }
            Err(e) => Html(error_fragment(&e.sanitized_message())),
        }
    }
}
