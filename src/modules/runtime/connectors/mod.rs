//! Database connectors for querygate
//!
//! This module provides the `Connector` contract and its PostgreSQL, MySQL
//! and SQLite adapters.

mod common;
mod factory;
#[cfg(test)]
pub(crate) mod mock;
mod mysql;
mod postgres;
mod sqlite;
mod traits;

pub use factory::connect;
pub use mysql::MySqlConnector;
pub use postgres::PostgresConnector;
pub use sqlite::SqliteConnector;
pub use traits::Connector;
