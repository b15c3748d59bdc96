// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod config;
pub mod logging;
pub mod probe;

#[cfg(test)]
mod test_utils;

pub use crate::config::ConnectionConfig;
pub use crate::core::db::{
    ActionOutcome, Backend, DatabaseConnection, QueryResult, Row, Session, SqlValue,
};
pub use crate::core::{DbError, DriverError, ErrorKind, Result};
