//! Shared fixture for integration tests.

use sqldesk::core::db::seed::initialize_database;
use sqldesk::core::db::{QueryExecutor, SqliteConnector};
use std::path::PathBuf;
use tempfile::TempDir;

/// A seeded database in its own temporary directory.
pub struct SeededDatabase {
    _dir: TempDir,
    pub path: PathBuf,
}

impl SeededDatabase {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database").join("consultas.db");
        initialize_database(&path).unwrap();
        SeededDatabase { _dir: dir, path }
    }

    #[allow(dead_code)]
    pub fn executor(&self) -> QueryExecutor<SqliteConnector> {
        QueryExecutor::new(SqliteConnector::new(&self.path))
    }
}
