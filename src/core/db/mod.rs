/// Database Module
///
/// This module provides the database layer for TaskU, organized into focused
/// submodules.
///
/// ## Architecture
///
/// - **Values** (`value.rs`): driver-neutral values, rows and results
/// - **Sessions** (`session.rs`): the trait every backend implements
/// - **Backends** (`mysql_session.rs`, `sqlite_session.rs`): one connection + statement handle per session
/// - **Connection** (`connection.rs`): the `DatabaseConnection` lifecycle wrapper
///
/// ## Error Handling
///
/// Backends return `DriverError`; `DatabaseConnection` classifies those into
/// `DbError` variants and logs them where they occur.
pub mod connection;
pub mod mysql_session;
pub mod session;
pub mod sqlite_session;
pub mod value;

pub use connection::*;
pub use session::{Backend, Session};
pub use value::*;
