/// # Test Utilities Module
///
/// Fixtures shared by the unit tests: a seeded database in its own temporary
/// directory, plus the executor and console wired to it.

use crate::console::Console;
use crate::core::db::seed::initialize_database;
use crate::core::db::{QueryExecutor, SqliteConnector};
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated database test fixture
///
/// The temporary directory (and the database in it) is removed on drop.
pub struct DatabaseFixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl DatabaseFixture {
    /// A fresh, empty database file
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("test.db");
        DatabaseFixture { _dir: dir, path }
    }

    /// A database with the sample tables and rows
    pub fn seeded() -> Self {
        let fixture = Self::empty();
        initialize_database(&fixture.path).expect("seed test database");
        fixture
    }

    pub fn connector(&self) -> SqliteConnector {
        SqliteConnector::new(&self.path)
    }

    pub fn executor(&self) -> QueryExecutor<SqliteConnector> {
        QueryExecutor::new(self.connector())
    }

    pub fn console(&self) -> Console<SqliteConnector> {
        Console::new(self.connector())
    }
}
