//! Connector construction keyed on the configuration's `type`

use querygate_core::{ConnectorConfig, GatewayError};
use querygate_types::ConnectorKind;
use std::sync::Arc;
use tracing::debug;

use super::mysql::MySqlConnector;
use super::postgres::PostgresConnector;
use super::sqlite::SqliteConnector;
use super::traits::Connector;

/// Build and connect the connector selected by `config["type"]`
pub async fn connect(config: &ConnectorConfig) -> Result<Arc<dyn Connector>, GatewayError> {
    let kind = config.kind()?;
    debug!("Creating {} connector from {:?}", kind, config);

    match kind {
        ConnectorKind::Postgres => {
            let connector = PostgresConnector::new(config).await?;
            Ok(Arc::new(connector))
        }
        ConnectorKind::Mysql => {
            let connector = MySqlConnector::new(config).await?;
            Ok(Arc::new(connector))
        }
        ConnectorKind::Sqlite => {
            let connector = SqliteConnector::new(config).await?;
            Ok(Arc::new(connector))
        }
    }
}
