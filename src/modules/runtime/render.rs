//! HTML rendering of query results
//!
//! The results template carries two placeholders: `$THS` receives one
//! `<th scope="col">` cell per column and `$TRS` one `<tr>` per row. Every
//! substituted value is HTML-escaped.

use querygate_types::{Header, QueryResult, Row};
use std::fmt::Write;

/// Placeholder replaced by the header cells
pub const HEADERS_PLACEHOLDER: &str = "$THS";

/// Placeholder replaced by the row markup
pub const ROWS_PLACEHOLDER: &str = "$TRS";

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<th scope="col">` cell per header
pub fn header_cells(headers: &[Header]) -> String {
    let mut out = String::new();
    for header in headers {
        let _ = write!(out, "<th scope=\"col\">{}</th>", escape_html(&header.name));
    }
    out
}

/// `<tr>` per row with one `<td>` per cell
pub fn row_markup(rows: &[Row]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape_html(cell));
        }
        out.push_str("</tr>");
    }
    out
}

/// Fill the results template with a query result
pub fn render_results(template: &str, result: &QueryResult) -> String {
    template
        .replace(HEADERS_PLACEHOLDER, &header_cells(&result.headers))
        .replace(ROWS_PLACEHOLDER, &row_markup(&result.rows))
}

/// Error fragment swapped into the results area
pub fn error_fragment(message: &str) -> String {
    format!("<div class=\"bg-danger\">{}</div>", escape_html(message))
}
