//! Request boundary of the console.
//!
//! Decodes request bodies, applies the empty-statement rule and produces the
//! JSON responses for the three routes: execute, schema and examples. All
//! transports (line protocol, REPL, CLI) go through here.

use crate::catalog::{Example, EXAMPLES};
use crate::core::db::{ConnectionFactory, QueryExecutor, ResultEnvelope, Schema, Value};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

/// Message returned when a request carries no statement.
pub const EMPTY_QUERY_MESSAGE: &str = "Query cannot be empty";

/// Body of an execute request: `{"query": "...", "params": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub params: Option<Vec<Value>>,
}

impl ExecuteRequest {
    pub fn new(query: impl Into<String>) -> Self {
        ExecuteRequest {
            query: Some(query.into()),
            params: None,
        }
    }

    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = Some(params);
        self
    }
}

/// Response of the schema route.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaResponse {
    Success(Schema),
    Failure(String),
}

impl Serialize for SchemaResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            SchemaResponse::Success(schema) => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("schema", schema)?;
            }
            SchemaResponse::Failure(error) => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
            }
        }
        map.end()
    }
}

/// Response of the examples route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExamplesResponse {
    pub examples: &'static [Example],
}

/// The console: an executor plus the boundary rules around it.
#[derive(Debug, Clone)]
pub struct Console<F> {
    executor: QueryExecutor<F>,
}

impl<F: ConnectionFactory> Console<F> {
    pub fn new(connector: F) -> Self {
        Console {
            executor: QueryExecutor::new(connector),
        }
    }

    pub fn executor(&self) -> &QueryExecutor<F> {
        &self.executor
    }

    /// Executes the statement of a decoded request.
    ///
    /// The statement is trimmed; an empty or missing one is rejected without
    /// touching the database.
    pub fn execute(&self, request: &ExecuteRequest) -> ResultEnvelope {
        let query = request.query.as_deref().unwrap_or("").trim();
        if query.is_empty() {
            debug!("Rejected empty query");
            return ResultEnvelope::failure(EMPTY_QUERY_MESSAGE);
        }
        self.executor.execute(query, request.params.as_deref())
    }

    /// Executes a raw JSON request body.
    pub fn execute_body(&self, body: &str) -> ResultEnvelope {
        match serde_json::from_str::<ExecuteRequest>(body) {
            Ok(request) => self.execute(&request),
            Err(e) => {
                warn!("Invalid execute request: {}", e);
                ResultEnvelope::failure(format!("Invalid request body: {}", e))
            }
        }
    }

    /// Executes a bare SQL string with no parameters.
    pub fn execute_sql(&self, sql: &str) -> ResultEnvelope {
        self.execute(&ExecuteRequest::new(sql))
    }

    /// Reads the table/column schema of the database.
    pub fn schema(&self) -> SchemaResponse {
        match self.load_schema() {
            Ok(schema) => SchemaResponse::Success(schema),
            Err(e) => {
                warn!("Schema introspection failed: {}", e);
                SchemaResponse::Failure(e.to_string())
            }
        }
    }

    fn load_schema(&self) -> rusqlite::Result<Schema> {
        let conn = self.executor.connector().open()?;
        Schema::from_connection(&conn)
    }

    pub fn examples(&self) -> ExamplesResponse {
        ExamplesResponse { examples: EXAMPLES }
    }
}
