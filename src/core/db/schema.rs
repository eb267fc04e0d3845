/// Schema Introspection Module
///
/// Lists user tables and their columns the way the console reports them:
/// name, declared type, nullability and primary-key membership.

use rusqlite::{Connection, Row};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Represents a database column with its metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type name (e.g., "INTEGER", "TEXT"); empty when undeclared
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether the column lacks a NOT NULL constraint
    pub nullable: bool,
    /// Whether this column is part of the primary key
    #[serde(rename = "primaryKey")]
    pub primary_key: bool,
}

impl Column {
    /// Creates a Column from a `pragma_table_info` result row
    fn from_pragma_row(row: &Row) -> rusqlite::Result<Self> {
        let notnull: bool = row.get("notnull")?;
        let pk: i64 = row.get("pk")?;
        Ok(Column {
            name: row.get("name")?,
            type_name: row.get("type")?,
            nullable: !notnull,
            primary_key: pk > 0,
        })
    }
}

/// Represents a database table and its columns
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
}

/// All user tables of a database, in `sqlite_master` order.
///
/// Serializes as a JSON object keyed by table name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    /// Creates a new Schema by introspecting all tables in the database
    pub fn from_connection(conn: &Connection) -> rusqlite::Result<Self> {
        let mut tables = Vec::new();
        for name in get_table_names(conn)? {
            let columns = get_table_columns(conn, &name)?;
            tables.push(Table { name, columns });
        }
        Ok(Schema { tables })
    }

    /// Looks up a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for table in &self.tables {
            map.serialize_entry(&table.name, &table.columns)?;
        }
        map.end()
    }
}

/// Helper function to retrieve all user-defined table names
fn get_table_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;

    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(names)
}

/// Helper function to retrieve column information for a specific table
fn get_table_columns(conn: &Connection, table_name: &str) -> rusqlite::Result<Vec<Column>> {
    let mut stmt = conn.prepare("SELECT * FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map([table_name], |row| Column::from_pragma_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(columns)
}
