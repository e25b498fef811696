//! Run command implementation

use clap::Args;
use querygate_core::{GatewayError, ServerConfig};
use querygate_runtime::Runtime;
use std::path::PathBuf;

use super::Cli;

/// Run command arguments
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Override server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory holding search.html and search_results.html
    #[arg(long)]
    pub templates: Option<PathBuf>,
}

impl RunCommand {
    /// Server settings with the command-line overrides applied
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::default()
            .with_port_override(self.port)
            .with_templates_dir(self.templates.clone())
    }

    /// Execute the run command
    pub async fn execute(&self, cli: &Cli) -> Result<(), GatewayError> {
        let config = cli.load_config()?;
        let server_config = self.server_config();

        let connector = querygate_runtime::connect(&config).await?;
        let runtime = match Runtime::new(server_config, connector.clone()) {
            Ok(runtime) => runtime,
            Err(e) => {
                connector.close().await?;
                return Err(e);
            }
        };
        runtime.run().await?;

        Ok(())
    }
}
