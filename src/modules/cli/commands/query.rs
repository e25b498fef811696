//! Query command implementation

use clap::Args;
use querygate_core::GatewayError;
use querygate_types::QueryResult;

use super::Cli;

/// Query command arguments
#[derive(Args, Debug)]
pub struct QueryCommand {
    /// Print the result as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Statement sent to the database verbatim
    pub statement: String,
}

impl QueryCommand {
    /// Execute the query command
    pub async fn execute(&self, cli: &Cli) -> Result<(), GatewayError> {
        let config = cli.load_config()?;
        let connector = querygate_runtime::connect(&config).await?;

        let result = connector.query(&self.statement).await;
        let result = super::settle(result, connector.close().await)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", format_table(&result));
        }

        Ok(())
    }
}

/// Render a result as an aligned text table followed by a summary line
pub fn format_table(result: &QueryResult) -> String {
    let mut widths: Vec<usize> = result
        .headers
        .iter()
        .map(|h| h.name.chars().count())
        .collect();
    for row in &result.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };

    let mut out = String::new();
    if !result.headers.is_empty() {
        out.push_str(&line(result.column_names()));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("-+-"));
        out.push('\n');
        for row in &result.rows {
            out.push_str(&line(row.iter().map(String::as_str).collect()));
            out.push('\n');
        }
    }

    let noun = if result.row_count() == 1 { "row" } else { "rows" };
    out.push_str(&format!(
        "({} {}, {} ms)\n",
        result.row_count(),
        noun,
        result.duration_ms
    ));
    out
}
