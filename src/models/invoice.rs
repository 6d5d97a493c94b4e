//! Modelo de Factura
//!
//! Una factura es un snapshot inmutable del costo de una orden al momento
//! de emitirse: cambios posteriores en la orden no la modifican. A lo sumo
//! existe una factura por orden.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::AppError;

/// IVA fijo del 19%
const IVA_RATE: Decimal = Decimal::from_parts(19, 0, 0, false, 2);

/// Estado de una factura
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pendiente,
    Pagada,
    Anulada,
}

impl InvoiceStatus {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "pendiente" => Ok(InvoiceStatus::Pendiente),
            "pagada" => Ok(InvoiceStatus::Pagada),
            "anulada" => Ok(InvoiceStatus::Anulada),
            _ => Err(AppError::InvalidState(
                "Estado inválido. Debe ser: pendiente, pagada o anulada".to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pendiente => "pendiente",
            InvoiceStatus::Pagada => "pagada",
            InvoiceStatus::Anulada => "anulada",
        }
    }
}

/// Montos derivados de una factura
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceAmounts {
    pub subtotal: Decimal,
    pub iva: Decimal,
    pub descuento: Decimal,
    pub total: Decimal,
}

impl InvoiceAmounts {
    /// Calcular los montos a partir del costo total de la orden:
    /// iva = round(subtotal × 0.19, 2), total = subtotal + iva − descuento
    pub fn compute(subtotal: Decimal, descuento: Decimal) -> Self {
        let iva = (subtotal * IVA_RATE)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let total = subtotal + iva - descuento;

        Self {
            subtotal,
            iva,
            descuento,
            total,
        }
    }
}

/// Factura - mapea a la tabla factura
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Invoice {
    pub id_factura: i32,
    pub id_orden: i32,
    pub fecha_emision: DateTime<Utc>,
    pub subtotal: Decimal,
    pub iva: Decimal,
    pub descuento: Decimal,
    pub total: Decimal,
    pub metodo_pago: Option<String>,
    pub estado: String,
    pub observaciones: Option<String>,
}

/// Factura con datos de la orden, el vehículo y el cliente (para listados)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvoiceSummary {
    pub id_factura: i32,
    pub id_orden: i32,
    pub fecha_emision: DateTime<Utc>,
    pub estado: String,
    pub metodo_pago: Option<String>,
    pub subtotal: Decimal,
    pub iva: Decimal,
    pub total: Decimal,
    pub id_vehiculo: i32,
    pub placa: String,
    pub marca: String,
    pub modelo: String,
    pub id_cliente: i32,
    pub cliente_nombre: String,
    pub diagnostico: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_for_order_with_labor_and_parts() {
        // labor 100000 + repuestos 250000 -> subtotal 350000
        let amounts = InvoiceAmounts::compute(Decimal::new(350000, 0), Decimal::ZERO);

        assert_eq!(amounts.subtotal, Decimal::new(350000, 0));
        assert_eq!(amounts.iva, Decimal::new(66500, 0));
        assert_eq!(amounts.total, Decimal::new(416500, 0));
    }

    #[test]
    fn iva_rounds_half_up_to_two_decimals() {
        // 155.55 × 0.19 = 29.5545 -> 29.55
        let amounts = InvoiceAmounts::compute(Decimal::new(15555, 2), Decimal::ZERO);
        assert_eq!(amounts.iva, Decimal::new(2955, 2));

        // 150.50 × 0.19 = 28.595 -> 28.60 (mitad hacia arriba)
        let amounts = InvoiceAmounts::compute(Decimal::new(15050, 2), Decimal::ZERO);
        assert_eq!(amounts.iva, Decimal::new(2860, 2));
    }

    #[test]
    fn discount_reduces_total_but_not_iva() {
        let amounts = InvoiceAmounts::compute(Decimal::new(100000, 0), Decimal::new(5000, 0));
        assert_eq!(amounts.iva, Decimal::new(19000, 0));
        assert_eq!(amounts.total, Decimal::new(114000, 0));
    }

    #[test]
    fn zero_subtotal_produces_zero_totals() {
        let amounts = InvoiceAmounts::compute(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(amounts.iva, Decimal::ZERO);
        assert_eq!(amounts.total, Decimal::ZERO);
    }

    #[test]
    fn parse_accepts_the_three_statuses() {
        for estado in ["pendiente", "pagada", "anulada"] {
            assert_eq!(InvoiceStatus::parse(estado).unwrap().as_str(), estado);
        }
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert!(InvoiceStatus::parse("reembolsada").is_err());
    }
}
