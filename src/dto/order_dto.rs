use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::order::{OrderDetailRow, PartUsageDetail, ServiceOrder};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub id_vehiculo: i32,
    pub diagnostico: Option<String>,
    pub costo_mano_obra: Option<Decimal>,
    pub estado: Option<String>,
    pub fecha_estimada: Option<DateTime<Utc>>,
    pub observaciones: Option<String>,
    pub id_mecanico: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    pub diagnostico: Option<String>,
    pub costo_mano_obra: Option<Decimal>,
    pub observaciones: Option<String>,
    pub fecha_estimada: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub estado: String,
    pub observaciones: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddPartRequest {
    pub id_repuesto: i32,
    pub cantidad: i32,
}

#[derive(Debug, Deserialize)]
pub struct SetLaborCostRequest {
    pub costo_mano_obra: Decimal,
}

/// Detalle completo de una orden: datos de la orden + líneas de repuestos
#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub orden: OrderDetailRow,
    pub repuestos: Vec<PartUsageDetail>,
}

/// Resultado de una mutación de costos sobre la orden
#[derive(Debug, Serialize)]
pub struct OrderCostResponse {
    pub message: String,
    pub costo_total: Decimal,
    pub orden: ServiceOrder,
}
