/// Connection Management Module
///
/// Every executor call opens its own connection through a
/// [`ConnectionFactory`] and drops it before returning. There is no pool and
/// no global connection state.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default time SQLite waits on a locked database file before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Capability to open a fresh database connection.
pub trait ConnectionFactory {
    /// Opens a new connection. The caller owns it and closes it by dropping.
    fn open(&self) -> rusqlite::Result<Connection>;
}

impl<F> ConnectionFactory for F
where
    F: Fn() -> rusqlite::Result<Connection>,
{
    fn open(&self) -> rusqlite::Result<Connection> {
        self()
    }
}

/// Opens connections to a SQLite file at a fixed path.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
    foreign_keys: bool,
    busy_timeout: Duration,
}

impl SqliteConnector {
    /// Creates a connector for the database file at `path`.
    ///
    /// The file is created by SQLite on first open if it does not exist;
    /// its parent directory must already exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteConnector {
            path: path.into(),
            foreign_keys: false,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Enables `PRAGMA foreign_keys` on every opened connection.
    pub fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// Sets how long a connection waits on a locked database.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionFactory for SqliteConnector {
    fn open(&self) -> rusqlite::Result<Connection> {
        debug!("Opening connection to {:?}", self.path);
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        if self.foreign_keys {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        }
        Ok(conn)
    }
}
