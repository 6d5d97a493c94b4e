//! Modelo de Repuesto
//!
//! El stock de un repuesto solo se modifica durante el procesamiento de
//! órdenes a través del ledger de inventario (reserve/release en
//! `PartRepository`); el ajuste directo de stock es una operación
//! administrativa separada.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Repuesto - mapea a la tabla repuesto
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Part {
    pub id_repuesto: i32,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub marca: Option<String>,
    pub precio_unitario: Decimal,
    pub stock_actual: i32,
    pub stock_minimo: i32,
    pub unidad_medida: String,
    pub activo: bool,
    pub fecha_registro: DateTime<Utc>,
}
