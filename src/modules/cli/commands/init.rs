//! Init command implementation

use clap::Args;
use querygate_core::GatewayError;
use querygate_types::ConnectorKind;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

const SEARCH_TEMPLATE: &str = include_str!("../../../../templates/search.html");
const RESULTS_TEMPLATE: &str = include_str!("../../../../templates/search_results.html");

/// Init command arguments
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Database connector type
    #[arg(short = 'd', long, default_value = "postgres")]
    pub connector: String,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self) -> Result<(), GatewayError> {
        let kind = ConnectorKind::from_str(&self.connector).map_err(GatewayError::configuration)?;
        info!("Initializing querygate project for {}", kind);

        let configs_dir = self.output.join("configs");
        let templates_dir = self.output.join("templates");
        fs::create_dir_all(&configs_dir)?;
        fs::create_dir_all(&templates_dir)?;

        let config_path = configs_dir.join(format!("example_{}.json", kind));
        let config = serde_json::to_string_pretty(&Self::example_config(kind))?;
        write_file(&config_path, &format!("{}\n", config))?;

        write_file(&templates_dir.join("search.html"), SEARCH_TEMPLATE)?;
        write_file(&templates_dir.join("search_results.html"), RESULTS_TEMPLATE)?;

        if kind.is_networked() {
            write_file(
                &self.output.join(".env.example"),
                "# Database password referenced from configs/*.json\nQUERYGATE_DB_PASSWORD=\n",
            )?;
        }

        // Print instructions
        println!("\nquerygate project initialized!");
        println!("\nNext steps:");
        println!(
            "  1. Copy {} to a name without 'example_' and fill in the connection details",
            config_path.display()
        );
        if kind.is_networked() {
            println!("  2. Copy .env.example to .env and set QUERYGATE_DB_PASSWORD");
        }
        println!("  3. Run: querygate run");

        Ok(())
    }

    /// Example configuration for a connector kind
    fn example_config(kind: ConnectorKind) -> serde_json::Value {
        match kind {
            ConnectorKind::Postgres => json!({
                "type": "postgres",
                "host": "localhost",
                "port": "5432",
                "databaseName": "postgres",
                "user": "postgres",
                "password": "{{ env.QUERYGATE_DB_PASSWORD }}",
                "sslMode": "disable"
            }),
            ConnectorKind::Mysql => json!({
                "type": "mysql",
                "host": "localhost",
                "port": "3306",
                "databaseName": "mysql",
                "user": "root",
                "password": "{{ env.QUERYGATE_DB_PASSWORD }}",
                "sslMode": "preferred"
            }),
            ConnectorKind::Sqlite => json!({
                "type": "sqlite",
                "path": "querygate.db",
                "createIfMissing": "true"
            }),
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), GatewayError> {
    fs::write(path, content)?;
    info!("Created: {}", path.display());
    Ok(())
}
