/// Core Module for sqldesk
///
/// Database access (connections, execution, schema, seeding) and the shared
/// error type. Everything user-facing sits on top of this.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{Result, SqldeskError};
