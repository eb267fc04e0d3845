/// Query Execution Module
///
/// Runs one arbitrary SQL statement per call and normalizes the outcome into
/// a [`ResultEnvelope`]. Driver failures never escape `execute`.

use super::connection::ConnectionFactory;
use super::value::{Row, Value};
use rusqlite::{params_from_iter, Connection};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

/// Confirmation message attached to successful write statements.
pub const WRITE_CONFIRMATION: &str = "Query executed successfully";

/// Outcome of executing a single statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEnvelope {
    /// A read statement succeeded.
    Rows {
        /// Rows in result order
        rows: Vec<Row>,
        /// Column names from the statement's metadata
        columns: Vec<String>,
    },
    /// A write or DDL statement succeeded and was committed.
    Affected {
        affected_row_count: u64,
        message: String,
    },
    /// The statement (or the boundary before it) failed.
    Failure { error_message: String },
}

impl ResultEnvelope {
    pub fn rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        ResultEnvelope::Rows { rows, columns }
    }

    pub fn affected(affected_row_count: u64) -> Self {
        ResultEnvelope::Affected {
            affected_row_count,
            message: WRITE_CONFIRMATION.to_string(),
        }
    }

    pub fn failure(error_message: impl Into<String>) -> Self {
        ResultEnvelope::Failure {
            error_message: error_message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, ResultEnvelope::Failure { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ResultEnvelope::Failure { error_message } => Some(error_message),
            _ => None,
        }
    }
}

impl Serialize for ResultEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        match self {
            ResultEnvelope::Rows { rows, columns } => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("rows", rows)?;
                map.serialize_entry("columns", columns)?;
            }
            ResultEnvelope::Affected {
                affected_row_count,
                message,
            } => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("affectedRowCount", affected_row_count)?;
                map.serialize_entry("message", message)?;
            }
            ResultEnvelope::Failure { error_message } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("errorMessage", error_message)?;
            }
        }
        map.end()
    }
}

/// SQL statement types, decided by the leading keyword only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementType {
    /// SELECT statement
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// REPLACE statement
    Replace,
    /// CREATE statement
    Create,
    /// DROP statement
    Drop,
    /// ALTER statement
    Alter,
    /// BEGIN/COMMIT/END/ROLLBACK/SAVEPOINT/RELEASE
    Transaction,
    /// Other statement types (PRAGMA, WITH, VACUUM, ...)
    Other,
}

impl StatementType {
    /// Determines the statement type from a SQL string
    ///
    /// Leading whitespace is ignored and the comparison is case-insensitive.
    /// Nothing beyond the first keyword is inspected.
    pub fn from_sql(sql: &str) -> Self {
        let sql_upper = sql.trim().to_uppercase();

        if sql_upper.starts_with("SELECT") {
            StatementType::Select
        } else if sql_upper.starts_with("INSERT") {
            StatementType::Insert
        } else if sql_upper.starts_with("UPDATE") {
            StatementType::Update
        } else if sql_upper.starts_with("DELETE") {
            StatementType::Delete
        } else if sql_upper.starts_with("REPLACE") {
            StatementType::Replace
        } else if sql_upper.starts_with("CREATE") {
            StatementType::Create
        } else if sql_upper.starts_with("DROP") {
            StatementType::Drop
        } else if sql_upper.starts_with("ALTER") {
            StatementType::Alter
        } else if ["BEGIN", "COMMIT", "END", "ROLLBACK", "SAVEPOINT", "RELEASE"]
            .iter()
            .any(|kw| sql_upper.starts_with(kw))
        {
            StatementType::Transaction
        } else {
            StatementType::Other
        }
    }

    /// Whether the statement is a read and produces `rows`/`columns`.
    pub fn is_read(self) -> bool {
        self == StatementType::Select
    }

    /// Whether the statement changes table data and is wrapped in its own
    /// transaction before the explicit commit.
    pub fn changes_data(self) -> bool {
        matches!(
            self,
            StatementType::Insert
                | StatementType::Update
                | StatementType::Delete
                | StatementType::Replace
        )
    }
}

/// Executes statements against connections from a [`ConnectionFactory`].
///
/// Each call opens a fresh connection and drops it before returning.
#[derive(Debug, Clone)]
pub struct QueryExecutor<F> {
    connector: F,
}

impl<F: ConnectionFactory> QueryExecutor<F> {
    /// Creates a new QueryExecutor over the given connection factory
    pub fn new(connector: F) -> Self {
        QueryExecutor { connector }
    }

    pub fn connector(&self) -> &F {
        &self.connector
    }

    /// Executes one statement, binding `params` positionally when given.
    ///
    /// Statements starting with `SELECT` return [`ResultEnvelope::Rows`];
    /// anything else is committed and returns [`ResultEnvelope::Affected`].
    /// Any driver error becomes [`ResultEnvelope::Failure`] with the driver's
    /// message unchanged.
    pub fn execute(&self, sql: &str, params: Option<&[Value]>) -> ResultEnvelope {
        let statement_type = StatementType::from_sql(sql);
        debug!(?statement_type, "Executing statement: {}", sql);

        match self.run(sql, statement_type, params.unwrap_or_default()) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Statement failed: {}", e);
                ResultEnvelope::failure(e.to_string())
            }
        }
    }

    fn run(
        &self,
        sql: &str,
        statement_type: StatementType,
        params: &[Value],
    ) -> rusqlite::Result<ResultEnvelope> {
        let mut conn = self.connector.open()?;

        if statement_type.is_read() {
            let (columns, rows) = fetch_rows(&conn, sql, params)?;
            debug!("Statement returned {} rows", rows.len());
            Ok(ResultEnvelope::rows(columns, rows))
        } else {
            let changed = match apply_write(&mut conn, sql, statement_type, params) {
                Ok(changed) => changed,
                Err(e) if is_empty_statement(&e) => 0,
                Err(e) => return Err(e),
            };
            debug!("Statement changed {} rows", changed);
            Ok(ResultEnvelope::affected(changed))
        }
    }
}

/// Input holding no statement at all (`;`, a lone comment) prepares to
/// nothing, and the driver reports that as a failure carrying `SQLITE_OK`.
fn is_empty_statement(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_OK
    )
}

/// Runs a read statement and collects every row.
fn fetch_rows(
    conn: &Connection,
    sql: &str,
    params: &[Value],
) -> rusqlite::Result<(Vec<String>, Vec<Row>)> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(params_from_iter(params))?;
    let mut collected = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Row::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            record.insert(name.as_str(), Value::try_from(row.get_ref(i)?)?);
        }
        collected.push(record);
    }

    Ok((columns, collected))
}

/// Runs a write statement and commits it. Returns the change count.
fn apply_write(
    conn: &mut Connection,
    sql: &str,
    statement_type: StatementType,
    params: &[Value],
) -> rusqlite::Result<u64> {
    if statement_type.changes_data() && conn.is_autocommit() {
        let tx = conn.transaction()?;
        let changed = run_to_completion(&tx, sql, params)?;
        tx.commit()?;
        return Ok(changed);
    }

    let changed = run_to_completion(conn, sql, params)?;
    if !conn.is_autocommit() {
        conn.execute_batch("COMMIT")?;
    }
    Ok(changed)
}

/// Steps a statement until done, discarding any rows it yields.
fn run_to_completion(conn: &Connection, sql: &str, params: &[Value]) -> rusqlite::Result<u64> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(params))?;
    while rows.next()?.is_some() {}
    drop(rows);
    drop(stmt);
    Ok(conn.changes() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::DatabaseFixture;
    use serde_json::json;

    #[test]
    fn test_select_returns_rows_and_columns() {
        let fixture = DatabaseFixture::seeded();
        let envelope = fixture.executor().execute("SELECT * FROM usuarios;", None);

        match envelope {
            ResultEnvelope::Rows { rows, columns } => {
                assert_eq!(rows.len(), 5);
                assert_eq!(columns, vec!["id", "nombre", "email", "edad", "fecha_registro"]);
                assert_eq!(rows[0].get("nombre"), Some(&Value::from("Juan Pérez")));
                assert_eq!(rows[0].get("edad"), Some(&Value::Integer(28)));
            }
            other => panic!("Expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_select_classification_ignores_case_and_whitespace() {
        let fixture = DatabaseFixture::seeded();
        let envelope = fixture
            .executor()
            .execute("  \n\tselect nombre FROM productos WHERE precio > 100", None);

        match envelope {
            ResultEnvelope::Rows { rows, columns } => {
                assert_eq!(columns, vec!["nombre"]);
                assert_eq!(rows.len(), 3);
            }
            other => panic!("Expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_update_reports_affected_rows() {
        let fixture = DatabaseFixture::seeded();
        let envelope = fixture
            .executor()
            .execute("UPDATE productos SET precio = 899.99 WHERE nombre = 'Laptop';", None);

        assert_eq!(envelope, ResultEnvelope::affected(1));

        let check = fixture
            .executor()
            .execute("SELECT precio FROM productos WHERE nombre = 'Laptop'", None);
        match check {
            ResultEnvelope::Rows { rows, .. } => {
                assert_eq!(rows[0].get("precio"), Some(&Value::Real(899.99)));
            }
            other => panic!("Expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_ddl_is_committed_and_reports_zero() {
        let fixture = DatabaseFixture::seeded();
        let executor = fixture.executor();

        let created = executor.execute("CREATE TABLE notas (id INTEGER PRIMARY KEY, texto TEXT)", None);
        assert_eq!(created, ResultEnvelope::affected(0));

        let listed = executor.execute("SELECT * FROM notas", None);
        assert_eq!(
            listed,
            ResultEnvelope::rows(vec!["id".to_string(), "texto".to_string()], vec![])
        );
    }

    #[test]
    fn test_positional_params_are_bound() {
        let fixture = DatabaseFixture::seeded();
        let executor = fixture.executor();

        let inserted = executor.execute(
            "INSERT INTO usuarios (nombre, email, edad) VALUES (?, ?, ?)",
            Some(&[Value::from("Eva"), Value::from("eva@email.com"), Value::Integer(40)]),
        );
        assert_eq!(inserted, ResultEnvelope::affected(1));

        let selected = executor.execute(
            "SELECT nombre, edad FROM usuarios WHERE email = ?",
            Some(&[Value::from("eva@email.com")]),
        );
        let expected_row: Row = vec![("nombre", Value::from("Eva")), ("edad", Value::Integer(40))]
            .into_iter()
            .collect();
        assert_eq!(
            selected,
            ResultEnvelope::rows(vec!["nombre".to_string(), "edad".to_string()], vec![expected_row])
        );
    }

    #[test]
    fn test_missing_table_is_failure() {
        let fixture = DatabaseFixture::seeded();
        let envelope = fixture.executor().execute("SELECT * FROM nope;", None);

        assert!(!envelope.is_success());
        assert_eq!(envelope.error_message(), Some("no such table: nope"));
    }

    #[test]
    fn test_constraint_violation_is_failure_and_rolled_back() {
        let fixture = DatabaseFixture::seeded();
        let executor = fixture.executor();

        let envelope = executor.execute(
            "INSERT INTO usuarios (nombre, email, edad) VALUES ('Otro Juan', 'juan@email.com', 50)",
            None,
        );
        let message = envelope.error_message().expect("Expected failure");
        assert!(message.contains("UNIQUE constraint failed"), "{}", message);

        match executor.execute("SELECT COUNT(*) AS total FROM usuarios", None) {
            ResultEnvelope::Rows { rows, .. } => {
                assert_eq!(rows[0].get("total"), Some(&Value::Integer(5)));
            }
            other => panic!("Expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_connection_failure_is_failure() {
        let executor = QueryExecutor::new(|| Connection::open("/nonexistent/dir/db.sqlite"));
        let envelope = executor.execute("SELECT 1", None);
        assert!(!envelope.is_success());
        assert!(!envelope.error_message().unwrap().is_empty());
    }

    #[test]
    fn test_parameter_count_mismatch_is_failure() {
        let fixture = DatabaseFixture::seeded();
        let envelope = fixture
            .executor()
            .execute("SELECT * FROM usuarios WHERE id = ?", Some(&[Value::Integer(1), Value::Integer(2)]));
        assert!(!envelope.is_success());
    }

    #[test]
    fn test_explicit_begin_is_committed() {
        let fixture = DatabaseFixture::seeded();
        let executor = fixture.executor();

        let begun = executor.execute("BEGIN", None);
        assert!(begun.is_success());

        // The next call gets a new connection; the database must not be locked.
        let updated = executor.execute("DELETE FROM ventas WHERE id = 1", None);
        assert_eq!(updated, ResultEnvelope::affected(1));
    }

    #[test]
    fn test_write_classified_statement_with_rows_discards_them() {
        let fixture = DatabaseFixture::seeded();
        let envelope = fixture.executor().execute("PRAGMA table_info(usuarios)", None);
        assert_eq!(envelope, ResultEnvelope::affected(0));
    }

    #[test]
    fn test_statement_free_input_is_a_no_op() {
        let fixture = DatabaseFixture::seeded();
        let executor = fixture.executor();

        for sql in [";", "-- just a comment", "/* c */"] {
            assert_eq!(executor.execute(sql, None), ResultEnvelope::affected(0), "{:?}", sql);
        }
    }

    #[test]
    fn test_invalid_utf8_text_is_failure() {
        let fixture = DatabaseFixture::seeded();
        let envelope = fixture.executor().execute("SELECT CAST(X'FF' AS TEXT) AS t", None);

        assert!(!envelope.is_success());
        assert!(!envelope.error_message().unwrap().is_empty());
    }

    #[test]
    fn test_blob_values() {
        let fixture = DatabaseFixture::seeded();
        let executor = fixture.executor();
        executor.execute("CREATE TABLE blobs (id INTEGER, data BLOB)", None);
        executor.execute("INSERT INTO blobs VALUES (1, X'48656C6C6F')", None);

        match executor.execute("SELECT data FROM blobs WHERE id = 1", None) {
            ResultEnvelope::Rows { rows, .. } => {
                assert_eq!(rows[0].get("data"), Some(&Value::Blob(b"Hello".to_vec())));
            }
            other => panic!("Expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_json_shapes() {
        let row: Row = vec![("id", Value::Integer(1))].into_iter().collect();
        let rows = ResultEnvelope::rows(vec!["id".to_string()], vec![row]);
        assert_eq!(
            serde_json::to_value(&rows).unwrap(),
            json!({"success": true, "rows": [{"id": 1}], "columns": ["id"]})
        );

        assert_eq!(
            serde_json::to_value(ResultEnvelope::affected(2)).unwrap(),
            json!({"success": true, "affectedRowCount": 2, "message": "Query executed successfully"})
        );

        assert_eq!(
            serde_json::to_value(ResultEnvelope::failure("boom")).unwrap(),
            json!({"success": false, "errorMessage": "boom"})
        );
    }

    #[test]
    fn test_statement_type_classification() {
        assert_eq!(StatementType::from_sql("SELECT * FROM users"), StatementType::Select);
        assert_eq!(StatementType::from_sql("  select 1"), StatementType::Select);
        assert_eq!(StatementType::from_sql("INSERT INTO users VALUES (1, 'test')"), StatementType::Insert);
        assert_eq!(StatementType::from_sql("UPDATE users SET name = 'new'"), StatementType::Update);
        assert_eq!(StatementType::from_sql("DELETE FROM users WHERE id = 1"), StatementType::Delete);
        assert_eq!(StatementType::from_sql("REPLACE INTO users VALUES (1)"), StatementType::Replace);
        assert_eq!(StatementType::from_sql("CREATE TABLE test (id INTEGER)"), StatementType::Create);
        assert_eq!(StatementType::from_sql("DROP TABLE test"), StatementType::Drop);
        assert_eq!(StatementType::from_sql("ALTER TABLE t ADD c"), StatementType::Alter);
        assert_eq!(StatementType::from_sql("BEGIN"), StatementType::Transaction);
        assert_eq!(StatementType::from_sql("commit"), StatementType::Transaction);
        assert_eq!(StatementType::from_sql("PRAGMA foreign_keys = ON"), StatementType::Other);
        assert_eq!(StatementType::from_sql("WITH x AS (SELECT 1) SELECT * FROM x"), StatementType::Other);
    }

    #[test]
    fn test_only_select_is_read() {
        assert!(StatementType::Select.is_read());
        assert!(!StatementType::Other.is_read());
        assert!(StatementType::Insert.changes_data());
        assert!(StatementType::Replace.changes_data());
        assert!(!StatementType::Create.changes_data());
        assert!(!StatementType::Transaction.changes_data());
    }
}
