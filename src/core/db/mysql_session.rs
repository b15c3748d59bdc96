/// MySQL Session
///
/// Blocking MySQL backend built on the `mysql` crate. Every statement goes
/// through the binary protocol so result values keep their column types.

use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Params, TxOpts};
use tracing::{debug, warn};

use crate::config::ConnectionConfig;
use crate::core::db::session::{Backend, DriverResult, Session};
use crate::core::db::{ActionOutcome, QueryResult, Row, SqlValue};
use crate::core::DriverError;

pub struct MysqlSession {
    conn: Conn,
}

impl MysqlSession {
    /// Connects with the configured host, port, credentials and schema, then
    /// runs a round trip to confirm the server is answering.
    pub fn open(config: &ConnectionConfig) -> DriverResult<Self> {
        let mut conn = Conn::new(connect_options(config))?;

        conn.query_drop("SELECT 1")
            .map_err(|e| DriverError::Verification(e.to_string()))?;

        Ok(MysqlSession { conn })
    }
}

fn connect_options(config: &ConnectionConfig) -> OptsBuilder {
    let password = (!config.password.is_empty()).then(|| config.password.clone());

    OptsBuilder::new()
        .ip_or_hostname(Some(config.host.clone()))
        .tcp_port(config.port)
        .user(Some(config.user.clone()))
        .pass(password)
        .db_name(Some(config.database.clone()))
}

fn to_params(params: &[SqlValue]) -> Params {
    if params.is_empty() {
        Params::Empty
    } else {
        Params::Positional(params.iter().map(mysql::Value::from).collect())
    }
}

impl Session for MysqlSession {
    fn backend(&self) -> Backend {
        Backend::Mysql
    }

    fn query(&mut self, sql: &str, params: &[SqlValue]) -> DriverResult<QueryResult> {
        debug!(sql, params = params.len(), "mysql query");
        let stmt = self.conn.prep(sql)?;
        let columns: Vec<String> = stmt
            .columns()
            .iter()
            .map(|column| column.name_str().into_owned())
            .collect();

        let raw_rows: Vec<mysql::Row> = self.conn.exec(&stmt, to_params(params))?;
        let rows = raw_rows
            .into_iter()
            .map(|row| {
                // Row::unwrap hands back the column values in order.
                let values = row.unwrap().into_iter().map(SqlValue::from).collect();
                Row::new(&columns, values)
            })
            .collect();

        Ok(QueryResult::new(columns, rows))
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> DriverResult<ActionOutcome> {
        debug!(sql, params = params.len(), "mysql action");
        let mut tx = self.conn.start_transaction(TxOpts::default())?;

        match tx.exec_drop(sql, to_params(params)) {
            Ok(()) => {
                let affected_rows = tx.affected_rows();
                // COMMIT resets the id, read it first.
                let last_insert_id = tx.last_insert_id().filter(|id| *id > 0);
                tx.commit()?;
                Ok(ActionOutcome {
                    affected_rows,
                    last_insert_id,
                })
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(error = %rollback_err, "mysql rollback failed");
                }
                Err(err.into())
            }
        }
    }

    fn list_tables(&mut self) -> DriverResult<Vec<String>> {
        let names: Vec<String> = self.conn.query("SHOW TABLES")?;
        Ok(names)
    }

    fn close(self: Box<Self>) -> DriverResult<()> {
        // Dropping the connection closes its cached statements and sends COM_QUIT.
        drop(self.conn);
        Ok(())
    }
}
