/// Core Module for TaskU DB
///
/// Shared infrastructure: the error taxonomy and the database layer.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{DbError, DriverError, ErrorKind, Result};
