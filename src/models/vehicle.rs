//! Modelo de Vehículo

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Vehículo - mapea a la tabla vehiculo
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vehicle {
    pub id_vehiculo: i32,
    pub placa: String,
    pub marca: String,
    pub modelo: String,
    pub anio: i32,
    pub color: Option<String>,
    pub tipo_vehiculo: Option<String>,
    pub kilometraje: i32,
    pub id_cliente: i32,
    pub fecha_registro: DateTime<Utc>,
}

/// Vehículo con datos del cliente propietario (para listados)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VehicleWithClient {
    pub id_vehiculo: i32,
    pub placa: String,
    pub marca: String,
    pub modelo: String,
    pub anio: i32,
    pub color: Option<String>,
    pub tipo_vehiculo: Option<String>,
    pub kilometraje: i32,
    pub id_cliente: i32,
    pub fecha_registro: DateTime<Utc>,
    pub cliente_nombre: String,
    pub cliente_telefono: String,
    pub cliente_correo: Option<String>,
}
