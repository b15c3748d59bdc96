/// # Test Utilities Module
///
/// Fixtures shared by the unit tests: isolated in-memory databases and a
/// configuration that can never connect.

use crate::config::ConnectionConfig;
use crate::core::db::DatabaseConnection;

/// Schema used by most fixtures.
pub const USERS_SCHEMA: &str =
    "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL)";

/// Connected in-memory SQLite database with an empty `users` table.
pub fn memory_connection() -> DatabaseConnection {
    let mut db = DatabaseConnection::open(ConnectionConfig::sqlite(":memory:"))
        .expect("in-memory database should open");
    db.execute_action(USERS_SCHEMA, &[])
        .expect("fixture schema should apply");
    db
}

/// MySQL config pointing at a loopback port nothing listens on.
pub fn unreachable_mysql_config() -> ConnectionConfig {
    ConnectionConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        ..ConnectionConfig::default()
    }
}
