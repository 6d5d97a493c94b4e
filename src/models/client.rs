//! Modelo de Cliente

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Cliente - mapea a la tabla cliente
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Client {
    pub id_cliente: i32,
    pub nombre: String,
    pub telefono: String,
    pub correo: String,
    pub direccion: Option<String>,
    pub fecha_registro: DateTime<Utc>,
    pub activo: bool,
}
