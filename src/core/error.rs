/// TaskU DB Error Module
///
/// This module defines the error taxonomy for database operations. Every
/// failure is logged where it happens and then handed back to the caller as
/// a value, never as a panic.
use std::fmt;

use thiserror::Error;

use crate::core::db::Backend;

/// Errors raised by the underlying driver, before they are classified.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Errors from the MySQL client
    #[error("{0}")]
    Mysql(#[from] mysql::Error),

    /// Errors from SQLite
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The driver opened a connection that then failed its liveness check
    #[error("connection verification failed: {0}")]
    Verification(String),
}

/// Error type for every operation exposed by the crate.
///
/// The first three variants mirror the three failure classes of a
/// connection's lifecycle:
/// - `Connect`: network, authentication or configuration failure on connect
/// - `Query`: failure while running a read statement
/// - `Action`: failure while running a write statement (always rolled back)
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Error connecting to {backend}: {source}")]
    Connect {
        backend: Backend,
        #[source]
        source: DriverError,
    },

    #[error("Error executing query: {0}")]
    Query(#[source] DriverError),

    #[error("Error executing action: {0}")]
    Action(#[source] DriverError),

    /// An operation that needs an open connection was called while closed
    #[error("Not connected to a database")]
    NotConnected,

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DbError {
    /// Short label of the failure class, used as a log field.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::Connect { .. } => ErrorKind::Connect,
            DbError::Query(_) => ErrorKind::Query,
            DbError::Action(_) => ErrorKind::Action,
            DbError::NotConnected => ErrorKind::NotConnected,
            DbError::Config(_) | DbError::Toml(_) | DbError::Io(_) => ErrorKind::Config,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connect,
    Query,
    Action,
    NotConnected,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Connect => "connect",
            ErrorKind::Query => "query",
            ErrorKind::Action => "action",
            ErrorKind::NotConnected => "not_connected",
            ErrorKind::Config => "config",
        };
        f.write_str(label)
    }
}

/// Result alias using `DbError` as the error type.
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let connect_err = DbError::Connect {
            backend: Backend::Mysql,
            source: DriverError::Verification("server went away".to_string()),
        };
        assert_eq!(
            connect_err.to_string(),
            "Error connecting to MySQL: connection verification failed: server went away"
        );

        let query_err = DbError::Query(DriverError::Sqlite(rusqlite::Error::InvalidQuery));
        assert!(query_err.to_string().starts_with("Error executing query"));

        let action_err = DbError::Action(DriverError::Sqlite(rusqlite::Error::ExecuteReturnedResults));
        assert!(action_err.to_string().starts_with("Error executing action"));

        assert_eq!(DbError::NotConnected.to_string(), "Not connected to a database");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(DbError::NotConnected.kind(), ErrorKind::NotConnected);
        assert_eq!(DbError::Config("bad port".into()).kind(), ErrorKind::Config);
        assert_eq!(
            DbError::Query(DriverError::Verification(String::new())).kind().to_string(),
            "query"
        );
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let db_err: DbError = io_err.into();
        match db_err {
            DbError::Io(_) => {}
            _ => panic!("Expected IO error"),
        }

        let toml_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let db_err: DbError = toml_err.into();
        assert_eq!(db_err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let err = DbError::Action(DriverError::Sqlite(rusqlite::Error::InvalidQuery));
        assert!(err.source().is_some());
    }
}
