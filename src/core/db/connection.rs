/// Connection Management Module
///
/// `DatabaseConnection` owns at most one open session (connection plus
/// statement handle) and walks it through CLOSED -> OPEN -> CLOSED.
/// Failures are logged where they happen and returned as `DbError`; the
/// connection stays usable after any of them.

use tracing::{error, info, warn};

use crate::config::ConnectionConfig;
use crate::core::db::session::{open_session, Session};
use crate::core::db::{ActionOutcome, QueryResult, SqlValue};
use crate::core::{DbError, Result};

/// A single database connection and its statement handle.
///
/// Dropping the value disconnects, so the handles are released exactly once
/// on every exit path.
///
/// # Examples
///
/// ```
/// use tasku_db::{sql_params, ConnectionConfig, DatabaseConnection};
///
/// let mut db = DatabaseConnection::open(ConnectionConfig::sqlite(":memory:"))?;
/// db.execute_action("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)", &[])?;
/// db.execute_action("INSERT INTO t (name) VALUES (?)", sql_params!["alice"])?;
/// let id = db.last_insert_id().unwrap();
/// let rows = db.execute_query("SELECT name FROM t WHERE id = ?", sql_params![id])?;
/// assert_eq!(rows.len(), 1);
/// # Ok::<(), tasku_db::DbError>(())
/// ```
pub struct DatabaseConnection {
    config: ConnectionConfig,
    session: Option<Box<dyn Session>>,
    last_insert_id: Option<u64>,
}

impl DatabaseConnection {
    /// Creates a closed connection. Nothing is opened until `connect`.
    pub fn new(config: ConnectionConfig) -> Self {
        DatabaseConnection {
            config,
            session: None,
            last_insert_id: None,
        }
    }

    /// Creates a connection and connects it.
    pub fn open(config: ConnectionConfig) -> Result<Self> {
        let mut conn = DatabaseConnection::new(config);
        conn.connect()?;
        Ok(conn)
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Opens the connection and its statement handle.
    ///
    /// A connection the driver opens but cannot verify counts as a connect
    /// failure. On failure both handles stay unset and `connect` may be
    /// called again. Calling this while already connected does nothing.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Connect` with the driver error.
    pub fn connect(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Ok(());
        }

        match open_session(&self.config) {
            Ok(session) => {
                self.session = Some(session);
                self.last_insert_id = None;
                info!(
                    backend = %self.config.backend,
                    target = %self.config.target(),
                    "Connected to database '{}'",
                    self.config.database
                );
                Ok(())
            }
            Err(source) => {
                let err = DbError::Connect {
                    backend: self.config.backend,
                    source,
                };
                error!(kind = %err.kind(), target = %self.config.target(), "{}", err);
                Err(err)
            }
        }
    }

    /// Releases the statement handle and then the connection.
    ///
    /// Returns `true` if an open connection was closed, `false` if there was
    /// nothing to close. Never fails; close errors are only logged.
    pub fn disconnect(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        self.last_insert_id = None;

        match session.close() {
            Ok(()) => info!(target = %self.config.target(), "Connection closed"),
            Err(err) => warn!(error = %err, "Connection closed with error"),
        }
        true
    }

    /// Runs a read statement with positional `?` parameters and returns all
    /// rows. An empty result means nothing matched.
    ///
    /// # Errors
    ///
    /// `DbError::NotConnected` before `connect`, `DbError::Query` for any
    /// driver failure (bad SQL, parameter count mismatch, lost connection).
    pub fn execute_query(&mut self, sql: &str, params: &[SqlValue]) -> Result<QueryResult> {
        let session = self.session.as_mut().ok_or_else(|| {
            warn!("Query attempted without an open connection");
            DbError::NotConnected
        })?;

        session.query(sql, params).map_err(|source| {
            let err = DbError::Query(source);
            warn!(kind = %err.kind(), sql, "{}", err);
            err
        })
    }

    /// Runs a write statement in its own transaction: committed on success,
    /// rolled back on failure.
    ///
    /// # Errors
    ///
    /// `DbError::NotConnected` before `connect` (no transaction is started),
    /// `DbError::Action` after a rollback.
    pub fn execute_action(&mut self, sql: &str, params: &[SqlValue]) -> Result<ActionOutcome> {
        let session = self.session.as_mut().ok_or_else(|| {
            warn!("Action attempted without an open connection");
            DbError::NotConnected
        })?;

        match session.execute(sql, params) {
            Ok(outcome) => {
                if outcome.last_insert_id.is_some() {
                    self.last_insert_id = outcome.last_insert_id;
                }
                Ok(outcome)
            }
            Err(source) => {
                let err = DbError::Action(source);
                warn!(kind = %err.kind(), sql, "{}", err);
                Err(err)
            }
        }
    }

    /// Identifier generated by the most recent successful insert, or `None`
    /// if nothing was inserted since connecting or the connection is closed.
    pub fn last_insert_id(&self) -> Option<u64> {
        self.session.as_ref().and(self.last_insert_id)
    }

    /// Names of the tables in the connected database.
    pub fn list_tables(&mut self) -> Result<Vec<String>> {
        let session = self.session.as_mut().ok_or(DbError::NotConnected)?;

        session.list_tables().map_err(|source| {
            let err = DbError::Query(source);
            warn!(kind = %err.kind(), "{}", err);
            err
        })
    }
}

impl Drop for DatabaseConnection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for DatabaseConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConnection")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .field("last_insert_id", &self.last_insert_id)
            .finish()
    }
}
