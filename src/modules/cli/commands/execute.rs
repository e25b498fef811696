//! Execute command implementation

use clap::Args;
use querygate_core::GatewayError;

use super::Cli;

/// Execute command arguments
#[derive(Args, Debug)]
pub struct ExecuteCommand {
    /// Statement sent to the database verbatim
    pub statement: String,
}

impl ExecuteCommand {
    /// Execute the execute command
    pub async fn execute(&self, cli: &Cli) -> Result<(), GatewayError> {
        let config = cli.load_config()?;
        let connector = querygate_runtime::connect(&config).await?;

        let outcome = connector.execute(&self.statement).await;
        let outcome = super::settle(outcome, connector.close().await)?;

        println!("{} rows affected", outcome.rows_affected);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn test_execute_against_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("cli.db");
        let file = dir.path().join("gate.json");
        std::fs::write(
            &file,
            format!(
                r#"{{"type": "sqlite", "path": "{}", "createIfMissing": true}}"#,
                db.display()
            ),
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "querygate",
            "-f",
            file.to_str().unwrap(),
            "execute",
            "CREATE TABLE t(v TEXT)",
        ])
        .unwrap();
        match &cli.command {
            super::super::Commands::Execute(cmd) => cmd.execute(&cli).await.unwrap(),
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(db.exists());
    }
}
