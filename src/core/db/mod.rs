/// Database Module
///
/// The database layer is split into focused submodules:
/// - **Connection Management** (`connection.rs`): the connection factory the executor opens through
/// - **Values** (`value.rs`): dynamically typed cells and rows
/// - **Query Execution** (`query.rs`): statement classification and the result envelope
/// - **Schema Introspection** (`schema.rs`): table and column metadata
/// - **Seeding** (`seed.rs`): the sample tables created on first start
pub mod connection;
pub mod query;
pub mod schema;
pub mod seed;
pub mod value;

pub use connection::*;
pub use query::*;
pub use schema::*;
pub use value::*;
