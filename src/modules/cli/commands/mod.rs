//! CLI commands

mod execute;
mod init;
mod query;
mod run;

pub use execute::ExecuteCommand;
pub use init::InitCommand;
pub use query::QueryCommand;
pub use run::RunCommand;

use clap::{Parser, Subcommand};
use querygate_core::{ConnectorConfig, GatewayError};
use std::path::PathBuf;
use tracing::{info, warn};

/// Default directory searched for connector configuration files
pub const DEFAULT_CONFIGS_DIR: &str = "configs";

/// querygate - a minimal query gateway over SQL databases
#[derive(Parser, Debug)]
#[command(name = "querygate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding connector configuration files
    ///
    /// Files whose name contains `example_` are skipped; of the rest, the
    /// last in sorted order is used.
    #[arg(long = "configs", global = true, default_value = DEFAULT_CONFIGS_DIR)]
    pub configs: PathBuf,

    /// Explicit configuration file (`.json`, `.yaml` or `.yml`); takes
    /// precedence over `--configs`
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the querygate server
    Run(RunCommand),

    /// Run a read statement and print the result
    Query(QueryCommand),

    /// Run a mutating statement and print the affected-row count
    Execute(ExecuteCommand),

    /// Scaffold example configuration and templates
    Init(InitCommand),
}

impl Cli {
    /// Load the connector configuration selected by `--file` or `--configs`
    pub fn load_config(&self) -> Result<ConnectorConfig, GatewayError> {
        match &self.file {
            Some(file) => {
                info!("Loading configuration from: {}", file.display());
                querygate_parser::parse_file(file)
            }
            None => {
                let path = querygate_parser::find_config(&self.configs)?;
                info!("Loading configuration from: {}", path.display());
                querygate_parser::parse_file(path)
            }
        }
    }
}

/// Combine a statement result with the outcome of closing the connector.
///
/// The statement error wins; a close failure is only returned when the
/// statement itself succeeded.
pub(crate) fn settle<T>(
    result: Result<T, GatewayError>,
    closed: Result<(), GatewayError>,
) -> Result<T, GatewayError> {
    match (result, closed) {
        (Err(e), Err(close_err)) => {
            warn!("Error closing connector: {}", close_err);
            Err(e)
        }
        (Ok(_), Err(close_err)) => Err(close_err),
        (result, Ok(())) => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_settle_keeps_statement_error() {
        let result: Result<(), GatewayError> =
            Err(GatewayError::statement("SELEC 1", "syntax error"));
        let err = settle(result, Err(GatewayError::connection("reset by peer"))).unwrap_err();
        assert!(matches!(err, GatewayError::Statement { .. }));
        assert!(err.to_string().contains("syntax error"));
    }

    #[test]
    fn test_settle_reports_close_failure_after_success() {
        let err = settle(Ok(3), Err(GatewayError::connection("reset by peer"))).unwrap_err();
        assert!(matches!(err, GatewayError::Connection(_)));
        assert_eq!(settle(Ok(3), Ok(())).unwrap(), 3);
    }

    #[test]
    fn test_cli_parse() {
        let cli = Cli::try_parse_from(["querygate", "run"]).unwrap();
        assert_eq!(cli.configs, PathBuf::from(DEFAULT_CONFIGS_DIR));
        assert!(cli.file.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["querygate", "query", "-f", "db.yaml", "-v", "SELECT 1"])
            .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("db.yaml")));
        assert!(cli.verbose);
        match cli.command {
            Commands::Query(cmd) => assert_eq!(cmd.statement, "SELECT 1"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_load_config_prefers_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.json");
        fs::write(&file, r#"{"type": "sqlite", "path": ":memory:"}"#).unwrap();

        let cli = Cli::try_parse_from([
            "querygate",
            "--configs",
            "/no/such/dir",
            "-f",
            file.to_str().unwrap(),
            "execute",
            "DELETE FROM t",
        ])
        .unwrap();
        let config = cli.load_config().unwrap();
        assert_eq!(config.get("path"), Some(":memory:"));
    }

    #[test]
    fn test_load_config_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("example_sqlite.json"), r#"{"type": "postgres"}"#).unwrap();
        fs::write(dir.path().join("local.yaml"), "type: sqlite\npath: ':memory:'\n").unwrap();

        let cli = Cli::try_parse_from([
            "querygate",
            "--configs",
            dir.path().to_str().unwrap(),
            "run",
        ])
        .unwrap();
        assert_eq!(cli.load_config().unwrap().get("type"), Some("sqlite"));
    }
}
