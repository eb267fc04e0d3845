use serde::Serialize;

/// A canned query shown to users as a starting point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Example {
    pub title: &'static str,
    pub query: &'static str,
}

/// Example queries against the sample database, in display order.
pub const EXAMPLES: &[Example] = &[
    Example {
        title: "Listar todos los usuarios",
        query: "SELECT * FROM usuarios;",
    },
    Example {
        title: "Productos con precio mayor a 100",
        query: "SELECT * FROM productos WHERE precio > 100;",
    },
    Example {
        title: "Contar usuarios por edad",
        query: "SELECT edad, COUNT(*) as cantidad FROM usuarios GROUP BY edad ORDER BY edad;",
    },
    Example {
        title: "Ventas con información de usuarios y productos",
        query: "SELECT
    v.id as venta_id,
    u.nombre as usuario,
    p.nombre as producto,
    v.cantidad,
    v.fecha_venta
FROM ventas v
JOIN usuarios u ON v.usuario_id = u.id
JOIN productos p ON v.producto_id = p.id
ORDER BY v.fecha_venta DESC;",
    },
    Example {
        title: "Insertar nuevo usuario",
        query: "INSERT INTO usuarios (nombre, email, edad) VALUES ('Nuevo Usuario', 'nuevo@email.com', 25);",
    },
    Example {
        title: "Actualizar precio de producto",
        query: "UPDATE productos SET precio = 899.99 WHERE nombre = 'Laptop';",
    },
];

/// Returns the example at a 1-based position, as listed to users.
pub fn example(position: usize) -> Option<&'static Example> {
    position.checked_sub(1).and_then(|i| EXAMPLES.get(i))
}
