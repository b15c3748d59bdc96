/// SQLite Session
///
/// Backend for file and in-memory SQLite databases. `database` in the
/// connection config is the file path; host, user, password and port are
/// not used.

use rusqlite::{params_from_iter, Connection, OpenFlags};
use tracing::{debug, warn};

use crate::config::ConnectionConfig;
use crate::core::db::session::{Backend, DriverResult, Session};
use crate::core::db::{ActionOutcome, QueryResult, Row, SqlValue};
use crate::core::DriverError;

const LIST_TABLES_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

pub struct SqliteSession {
    conn: Connection,
}

impl SqliteSession {
    /// Opens (creating if needed) the database named by `config.database`.
    ///
    /// Fails if the file cannot be opened, for example when its directory
    /// does not exist.
    pub fn open(config: &ConnectionConfig) -> DriverResult<Self> {
        let conn = if config.database == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open_with_flags(
                &config.database,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?
        };

        // Initialize connection with common pragmas
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| DriverError::Verification(e.to_string()))?;

        Ok(SqliteSession { conn })
    }
}

/// True for statements whose leading keyword is INSERT or REPLACE.
fn is_insert(sql: &str) -> bool {
    let keyword: String = sql
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_uppercase();
    keyword == "INSERT" || keyword == "REPLACE"
}

impl Session for SqliteSession {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    fn query(&mut self, sql: &str, params: &[SqlValue]) -> DriverResult<QueryResult> {
        debug!(sql, params = params.len(), "sqlite query");
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let values = (0..columns.len())
                    .map(|i| row.get_ref(i).map(SqlValue::from))
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(Row::new(&columns, values))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(QueryResult::new(columns, rows))
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> DriverResult<ActionOutcome> {
        debug!(sql, params = params.len(), "sqlite action");
        let tx = self.conn.transaction()?;

        match tx.execute(sql, params_from_iter(params.iter())) {
            Ok(affected) => {
                // last_insert_rowid survives non-inserts and rollbacks, so only
                // trust it right after an insert that wrote something.
                let rowid = tx.last_insert_rowid();
                tx.commit()?;
                Ok(ActionOutcome {
                    affected_rows: affected as u64,
                    last_insert_id: (is_insert(sql) && affected > 0 && rowid > 0)
                        .then_some(rowid as u64),
                })
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(error = %rollback_err, "sqlite rollback failed");
                }
                Err(err.into())
            }
        }
    }

    fn list_tables(&mut self) -> DriverResult<Vec<String>> {
        let mut stmt = self.conn.prepare(LIST_TABLES_SQL)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    fn close(self: Box<Self>) -> DriverResult<()> {
        self.conn.close().map_err(|(_, err)| err.into())
    }
}
