//! Database connector kind definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported database backends, selected by the `type` configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    /// PostgreSQL database
    Postgres,
    /// MySQL database
    Mysql,
    /// SQLite database file (or in-memory database)
    Sqlite,
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(ConnectorKind::Postgres),
            "mysql" => Ok(ConnectorKind::Mysql),
            "sqlite" | "sqlite3" => Ok(ConnectorKind::Sqlite),
            _ => Err(format!("Unknown connector type: {}", s)),
        }
    }
}

impl ConnectorKind {
    /// Returns all supported connector kinds
    pub fn all() -> &'static [ConnectorKind] {
        &[
            ConnectorKind::Postgres,
            ConnectorKind::Mysql,
            ConnectorKind::Sqlite,
        ]
    }

    /// Stable identifier, also returned by `Connector::name`
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorKind::Postgres => "postgres",
            ConnectorKind::Mysql => "mysql",
            ConnectorKind::Sqlite => "sqlite",
        }
    }

    /// Returns true if this backend talks to a server over the network
    pub fn is_networked(&self) -> bool {
        matches!(self, ConnectorKind::Postgres | ConnectorKind::Mysql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_kind_from_str() {
        assert_eq!(ConnectorKind::from_str("postgres").unwrap(), ConnectorKind::Postgres);
        assert_eq!(ConnectorKind::from_str("PostgreSQL").unwrap(), ConnectorKind::Postgres);
        assert_eq!(ConnectorKind::from_str("mysql").unwrap(), ConnectorKind::Mysql);
        assert_eq!(ConnectorKind::from_str("sqlite").unwrap(), ConnectorKind::Sqlite);
        assert_eq!(ConnectorKind::from_str("sqlite3").unwrap(), ConnectorKind::Sqlite);
        assert!(ConnectorKind::from_str("oracle").is_err());
        assert!(ConnectorKind::from_str("").is_err());
    }

    #[test]
    fn test_connector_kind_display() {
        for kind in ConnectorKind::all() {
            assert_eq!(kind.to_string(), kind.as_str());
            assert_eq!(ConnectorKind::from_str(kind.as_str()).unwrap(), *kind);
        }
    }

    #[test]
    fn test_connector_kind_serde() {
        let json = serde_json::to_string(&ConnectorKind::Postgres).unwrap();
        assert_eq!(json, "\"postgres\"");

        let kind: ConnectorKind = serde_json::from_str("\"sqlite\"").unwrap();
        assert_eq!(kind, ConnectorKind::Sqlite);
    }

    #[test]
    fn test_connector_kind_is_networked() {
        assert!(ConnectorKind::Postgres.is_networked());
        assert!(ConnectorKind::Mysql.is_networked());
        assert!(!ConnectorKind::Sqlite.is_networked());
    }
}
