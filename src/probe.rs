//! Connection probe: connect, list the tables, disconnect.
//!
//! This is what the `tasku-db` binary runs. Output goes to any writer so the
//! routine can be exercised without a terminal.

use std::io::Write;

use tracing::debug;

use crate::config::ConnectionConfig;
use crate::core::db::DatabaseConnection;
use crate::core::Result;

/// How the table list is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// What the probe got to before it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Connected and listed these tables
    Listed(Vec<String>),
    /// Connected, but the table listing failed
    ListFailed,
    /// Could not connect; nothing else was attempted
    ConnectFailed,
}

/// Connects with `config`, writes the table names to `out` and disconnects.
///
/// Database failures are reported in the output and in the returned outcome;
/// only write errors on `out` are returned as `Err`.
pub fn run_probe<W: Write>(
    config: ConnectionConfig,
    format: OutputFormat,
    out: &mut W,
) -> Result<ProbeOutcome> {
    let mut db = DatabaseConnection::new(config);

    if db.connect().is_err() {
        writeln!(out, "Could not establish the connection")?;
        return Ok(ProbeOutcome::ConnectFailed);
    }

    let outcome = match db.list_tables() {
        Ok(tables) => {
            debug!(count = tables.len(), "listed tables");
            match format {
                OutputFormat::Text => {
                    writeln!(out, "\n=== CONNECTION ESTABLISHED ===\n")?;
                    writeln!(out, "Tables in database:")?;
                    for table in &tables {
                        writeln!(out, " - {}", table)?;
                    }
                }
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut *out, &tables)
                        .map_err(std::io::Error::from)?;
                    writeln!(out)?;
                }
            }
            ProbeOutcome::Listed(tables)
        }
        Err(err) => {
            writeln!(out, "Could not list tables: {}", err)?;
            ProbeOutcome::ListFailed
        }
    };

    db.disconnect();
    Ok(outcome)
}
