//! Modelo de Orden de Servicio
//!
//! Incluye la máquina de estados del ciclo de vida de una orden y los
//! registros de uso de repuestos. Invariante de costos: después de cada
//! mutación, `costo_total == costo_mano_obra + Σ(uso_repuesto.subtotal)`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::AppError;

/// Estado del ciclo de vida de una orden de servicio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Diagnostico,
    Reparando,
    Finalizado,
    Entregado,
    Cancelado,
}

impl OrderStatus {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "diagnostico" => Ok(OrderStatus::Diagnostico),
            "reparando" => Ok(OrderStatus::Reparando),
            "finalizado" => Ok(OrderStatus::Finalizado),
            "entregado" => Ok(OrderStatus::Entregado),
            "cancelado" => Ok(OrderStatus::Cancelado),
            _ => Err(AppError::InvalidState(
                "Estado inválido. Debe ser: diagnostico, reparando, finalizado, entregado o cancelado"
                    .to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Diagnostico => "diagnostico",
            OrderStatus::Reparando => "reparando",
            OrderStatus::Finalizado => "finalizado",
            OrderStatus::Entregado => "entregado",
            OrderStatus::Cancelado => "cancelado",
        }
    }

    /// Estados desde los cuales no hay más transiciones
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Entregado | OrderStatus::Cancelado)
    }

    /// Una orden cerrada no admite mutaciones de costo
    /// (agregar/quitar repuestos, cambiar mano de obra)
    pub fn is_closed(&self) -> bool {
        self.is_terminal()
    }

    /// Verificar si la transición hacia `target` es válida.
    ///
    /// En modo permisivo (por defecto) cualquier estado reconocido es
    /// alcanzable desde cualquier otro. En modo estricto se sigue el grafo
    /// diagnostico → reparando → finalizado → entregado, con cancelado
    /// alcanzable desde cualquier estado no terminal.
    pub fn can_transition_to(&self, target: OrderStatus, strict: bool) -> bool {
        if !strict {
            return true;
        }

        match (self, target) {
            (OrderStatus::Diagnostico, OrderStatus::Reparando) => true,
            (OrderStatus::Reparando, OrderStatus::Finalizado) => true,
            (OrderStatus::Finalizado, OrderStatus::Entregado) => true,
            (_, OrderStatus::Cancelado) => !self.is_terminal(),
            _ => false,
        }
    }
}

/// Subtotal de una línea de uso de repuesto: cantidad × precio snapshot
pub fn line_subtotal(cantidad: i32, precio_unitario: Decimal) -> Decimal {
    Decimal::from(cantidad) * precio_unitario
}

/// Orden de servicio - mapea a la tabla orden_servicio
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ServiceOrder {
    pub id_orden: i32,
    pub fecha_ingreso: Option<DateTime<Utc>>,
    pub fecha_estimada: Option<DateTime<Utc>>,
    pub fecha_finalizacion: Option<DateTime<Utc>>,
    pub estado: String,
    pub diagnostico: Option<String>,
    pub observaciones: Option<String>,
    pub costo_mano_obra: Decimal,
    pub costo_total: Decimal,
    pub id_vehiculo: i32,
    pub id_mecanico: Option<i32>,
    pub fecha_creacion: Option<DateTime<Utc>>,
}

/// Orden con datos del vehículo y del cliente (para listados)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderSummary {
    pub id_orden: i32,
    pub fecha_ingreso: Option<DateTime<Utc>>,
    pub fecha_estimada: Option<DateTime<Utc>>,
    pub fecha_finalizacion: Option<DateTime<Utc>>,
    pub estado: String,
    pub diagnostico: Option<String>,
    pub observaciones: Option<String>,
    pub costo_mano_obra: Decimal,
    pub costo_total: Decimal,
    pub id_vehiculo: i32,
    pub placa: String,
    pub marca: String,
    pub modelo: String,
    pub id_cliente: i32,
    pub cliente_nombre: String,
    pub cliente_telefono: String,
}

/// Orden con el detalle completo del vehículo y del cliente
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderDetailRow {
    pub id_orden: i32,
    pub fecha_ingreso: Option<DateTime<Utc>>,
    pub fecha_estimada: Option<DateTime<Utc>>,
    pub fecha_finalizacion: Option<DateTime<Utc>>,
    pub estado: String,
    pub diagnostico: Option<String>,
    pub observaciones: Option<String>,
    pub costo_mano_obra: Decimal,
    pub costo_total: Decimal,
    pub id_vehiculo: i32,
    pub placa: String,
    pub marca: String,
    pub modelo: String,
    pub anio: i32,
    pub color: Option<String>,
    pub id_cliente: i32,
    pub cliente_nombre: String,
    pub cliente_telefono: String,
    pub cliente_correo: Option<String>,
    pub cliente_direccion: Option<String>,
}

/// Línea de uso de repuesto - mapea a la tabla uso_repuesto.
/// `precio_unitario` es el precio al momento del uso, no el precio vivo
/// del catálogo: cambios posteriores de precio no alteran órdenes
/// históricas.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PartUsage {
    pub id_uso: i32,
    pub id_orden: i32,
    pub id_repuesto: i32,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
    pub fecha_registro: DateTime<Utc>,
}

/// Línea de uso con datos del repuesto (para el detalle de una orden)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PartUsageDetail {
    pub id_uso: i32,
    pub id_orden: i32,
    pub id_repuesto: i32,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
    pub fecha_registro: DateTime<Utc>,
    pub nombre: String,
    pub codigo: String,
    pub marca: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_the_five_states() {
        for estado in [
            "diagnostico",
            "reparando",
            "finalizado",
            "entregado",
            "cancelado",
        ] {
            assert_eq!(OrderStatus::parse(estado).unwrap().as_str(), estado);
        }
    }

    #[test]
    fn parse_rejects_unknown_state() {
        assert!(matches!(
            OrderStatus::parse("pausado"),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn terminal_states_are_closed_for_cost_mutations() {
        assert!(OrderStatus::Entregado.is_closed());
        assert!(OrderStatus::Cancelado.is_closed());
        assert!(!OrderStatus::Diagnostico.is_closed());
        assert!(!OrderStatus::Reparando.is_closed());
        assert!(!OrderStatus::Finalizado.is_closed());
    }

    #[test]
    fn loose_mode_allows_any_recognized_transition() {
        assert!(OrderStatus::Entregado.can_transition_to(OrderStatus::Diagnostico, false));
        assert!(OrderStatus::Cancelado.can_transition_to(OrderStatus::Reparando, false));
    }

    #[test]
    fn strict_mode_follows_lifecycle_graph() {
        assert!(OrderStatus::Diagnostico.can_transition_to(OrderStatus::Reparando, true));
        assert!(OrderStatus::Reparando.can_transition_to(OrderStatus::Finalizado, true));
        assert!(OrderStatus::Finalizado.can_transition_to(OrderStatus::Entregado, true));

        assert!(!OrderStatus::Diagnostico.can_transition_to(OrderStatus::Finalizado, true));
        assert!(!OrderStatus::Entregado.can_transition_to(OrderStatus::Reparando, true));
    }

    #[test]
    fn strict_mode_allows_cancel_from_non_terminal_only() {
        assert!(OrderStatus::Diagnostico.can_transition_to(OrderStatus::Cancelado, true));
        assert!(OrderStatus::Reparando.can_transition_to(OrderStatus::Cancelado, true));
        assert!(OrderStatus::Finalizado.can_transition_to(OrderStatus::Cancelado, true));
        assert!(!OrderStatus::Entregado.can_transition_to(OrderStatus::Cancelado, true));
        assert!(!OrderStatus::Cancelado.can_transition_to(OrderStatus::Cancelado, true));
    }

    #[test]
    fn line_subtotal_is_quantity_times_snapshot_price() {
        let precio = Decimal::new(25000, 0);
        assert_eq!(line_subtotal(10, precio), Decimal::new(250000, 0));
    }
}
