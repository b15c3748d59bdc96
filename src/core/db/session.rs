/// Session Module
///
/// A `Session` is one open connection together with the statement handle
/// used to run everything on it. Each backend provides its own session;
/// `DatabaseConnection` only ever talks to the trait.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConnectionConfig;
use crate::core::db::{mysql_session, sqlite_session};
use crate::core::db::{ActionOutcome, QueryResult, SqlValue};
use crate::core::DriverError;

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Supported database backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// MySQL / MariaDB over TCP
    #[default]
    Mysql,
    /// SQLite file or in-memory database
    Sqlite,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Mysql => f.write_str("MySQL"),
            Backend::Sqlite => f.write_str("SQLite"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Backend::Mysql),
            "sqlite" | "sqlite3" => Ok(Backend::Sqlite),
            other => Err(format!("unknown backend '{}' (expected mysql or sqlite)", other)),
        }
    }
}

/// An open connection plus its statement handle.
///
/// Implementations run every method synchronously on the calling thread.
pub trait Session: Send {
    fn backend(&self) -> Backend;

    /// Runs a read statement and collects every row.
    fn query(&mut self, sql: &str, params: &[SqlValue]) -> DriverResult<QueryResult>;

    /// Runs a write statement inside its own transaction: commit on success,
    /// rollback on any error.
    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> DriverResult<ActionOutcome>;

    /// Names of the tables in the current database.
    fn list_tables(&mut self) -> DriverResult<Vec<String>>;

    /// Releases the statement handle, then the connection.
    fn close(self: Box<Self>) -> DriverResult<()>;
}

/// Opens a verified session for the configured backend.
pub fn open_session(config: &ConnectionConfig) -> DriverResult<Box<dyn Session>> {
    match config.backend {
        Backend::Mysql => Ok(Box::new(mysql_session::MysqlSession::open(config)?)),
        Backend::Sqlite => Ok(Box::new(sqlite_session::SqliteSession::open(config)?)),
    }
}
