//! Sample database created on first start.
//!
//! Three tables (`usuarios`, `productos`, `ventas`) with a handful of rows so
//! the example catalog has something to run against.

use crate::core::{Result, SqldeskError};
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS usuarios (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nombre TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    edad INTEGER,
    fecha_registro DATE DEFAULT CURRENT_DATE
);

CREATE TABLE IF NOT EXISTS productos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nombre TEXT NOT NULL,
    precio REAL NOT NULL,
    categoria TEXT,
    stock INTEGER DEFAULT 0
);

CREATE TABLE IF NOT EXISTS ventas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    usuario_id INTEGER,
    producto_id INTEGER,
    cantidad INTEGER,
    fecha_venta DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (usuario_id) REFERENCES usuarios (id),
    FOREIGN KEY (producto_id) REFERENCES productos (id)
);
"#;

const USUARIOS: [(&str, &str, i64); 5] = [
    ("Juan Pérez", "juan@email.com", 28),
    ("María García", "maria@email.com", 34),
    ("Carlos López", "carlos@email.com", 22),
    ("Ana Martín", "ana@email.com", 31),
    ("Luis Rodríguez", "luis@email.com", 26),
];

const PRODUCTOS: [(&str, f64, &str, i64); 5] = [
    ("Laptop", 999.99, "Electrónicos", 15),
    ("Mouse", 25.50, "Accesorios", 50),
    ("Teclado", 45.00, "Accesorios", 30),
    ("Monitor", 299.99, "Electrónicos", 20),
    ("Silla Gaming", 199.99, "Muebles", 8),
];

const VENTAS: [(i64, i64, i64); 5] = [(1, 1, 1), (2, 2, 2), (1, 3, 1), (3, 1, 1), (4, 4, 1)];

/// Creates the seed tables and, if `usuarios` is empty, the sample rows.
///
/// Safe to call on every start; existing data is left alone.
pub fn seed_database(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;

    let existing: i64 = tx.query_row("SELECT COUNT(*) FROM usuarios", [], |row| row.get(0))?;
    if existing == 0 {
        info!("Populating sample data");
        {
            let mut stmt = tx.prepare("INSERT INTO usuarios (nombre, email, edad) VALUES (?1, ?2, ?3)")?;
            for (nombre, email, edad) in USUARIOS {
                stmt.execute(params![nombre, email, edad])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO productos (nombre, precio, categoria, stock) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (nombre, precio, categoria, stock) in PRODUCTOS {
                stmt.execute(params![nombre, precio, categoria, stock])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO ventas (usuario_id, producto_id, cantidad) VALUES (?1, ?2, ?3)",
            )?;
            for (usuario_id, producto_id, cantidad) in VENTAS {
                stmt.execute(params![usuario_id, producto_id, cantidad])?;
            }
        }
    } else {
        debug!("Sample data already present ({} usuarios)", existing);
    }

    tx.commit()?;
    Ok(())
}

/// Makes sure the database file's directory exists, then seeds the file.
pub fn initialize_database(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                SqldeskError::Config(format!(
                    "Cannot create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    info!("Initializing database at {}", path.display());
    let mut conn = Connection::open(path)?;
    seed_database(&mut conn)
}
