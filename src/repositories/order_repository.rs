//! Repositorio de órdenes de servicio
//!
//! Las operaciones que participan en el flujo de costos (bloqueo de la
//! orden, líneas de uso, recómputo del total) reciben la transacción del
//! llamador: una mutación lógica completa es siempre una sola transacción.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::order::{OrderDetailRow, OrderSummary, PartUsage, PartUsageDetail, ServiceOrder};
use crate::utils::errors::{is_foreign_key_violation, AppError};

/// Campos mínimos de la orden para decidir una mutación de costos
#[derive(Debug, sqlx::FromRow)]
pub struct LockedOrder {
    pub estado: String,
    pub costo_mano_obra: Decimal,
}

pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, id_cliente: Option<i32>) -> Result<Vec<OrderSummary>, AppError> {
        let base = r#"
            SELECT o.id_orden, o.fecha_ingreso, o.fecha_estimada, o.fecha_finalizacion,
                   o.estado, o.diagnostico, o.observaciones, o.costo_mano_obra, o.costo_total,
                   o.id_vehiculo, v.placa, v.marca, v.modelo,
                   c.id_cliente, c.nombre AS cliente_nombre, c.telefono AS cliente_telefono
            FROM orden_servicio o
            JOIN vehiculo v ON o.id_vehiculo = v.id_vehiculo
            JOIN cliente c ON v.id_cliente = c.id_cliente
        "#;

        let orders = match id_cliente {
            // Un usuario cliente solo ve sus propias órdenes
            Some(id) => {
                let query = format!("{} WHERE c.id_cliente = $1 ORDER BY o.id_orden DESC", base);
                sqlx::query_as::<_, OrderSummary>(&query)
                    .bind(id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!("{} ORDER BY o.id_orden DESC", base);
                sqlx::query_as::<_, OrderSummary>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(orders)
    }

    pub async fn find_detail(&self, id_orden: i32) -> Result<Option<OrderDetailRow>, AppError> {
        let order = sqlx::query_as::<_, OrderDetailRow>(
            r#"
            SELECT o.id_orden, o.fecha_ingreso, o.fecha_estimada, o.fecha_finalizacion,
                   o.estado, o.diagnostico, o.observaciones, o.costo_mano_obra, o.costo_total,
                   o.id_vehiculo, v.placa, v.marca, v.modelo, v.anio, v.color,
                   c.id_cliente, c.nombre AS cliente_nombre, c.telefono AS cliente_telefono,
                   c.correo AS cliente_correo, c.direccion AS cliente_direccion
            FROM orden_servicio o
            JOIN vehiculo v ON o.id_vehiculo = v.id_vehiculo
            JOIN cliente c ON v.id_cliente = c.id_cliente
            WHERE o.id_orden = $1
            "#,
        )
        .bind(id_orden)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn find_usages(&self, id_orden: i32) -> Result<Vec<PartUsageDetail>, AppError> {
        let usages = sqlx::query_as::<_, PartUsageDetail>(
            r#"
            SELECT ur.id_uso, ur.id_orden, ur.id_repuesto, ur.cantidad,
                   ur.precio_unitario, ur.subtotal, ur.fecha_registro,
                   r.nombre, r.codigo, r.marca
            FROM uso_repuesto ur
            JOIN repuesto r ON ur.id_repuesto = r.id_repuesto
            WHERE ur.id_orden = $1
            ORDER BY ur.id_uso
            "#,
        )
        .bind(id_orden)
        .fetch_all(&self.pool)
        .await?;

        Ok(usages)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        id_vehiculo: i32,
        diagnostico: &str,
        costo_mano_obra: Decimal,
        estado: &str,
        fecha_estimada: Option<chrono::DateTime<chrono::Utc>>,
        observaciones: &str,
        id_mecanico: Option<i32>,
    ) -> Result<ServiceOrder, AppError> {
        // La orden nace sin repuestos: costo_total = costo_mano_obra
        let order = sqlx::query_as::<_, ServiceOrder>(
            r#"
            INSERT INTO orden_servicio
                (id_vehiculo, diagnostico, costo_mano_obra, estado, fecha_estimada, observaciones, id_mecanico, costo_total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $3)
            RETURNING *
            "#,
        )
        .bind(id_vehiculo)
        .bind(diagnostico)
        .bind(costo_mano_obra)
        .bind(estado)
        .bind(fecha_estimada)
        .bind(observaciones)
        .bind(id_mecanico)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::Validation("Vehículo no encontrado".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(order)
    }

    /// Bloquear la fila de la orden dentro de la transacción actual y
    /// devolver los campos que gobiernan la mutación de costos.
    pub async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id_orden: i32,
    ) -> Result<LockedOrder, AppError> {
        let order: Option<LockedOrder> = sqlx::query_as(
            "SELECT estado, costo_mano_obra FROM orden_servicio WHERE id_orden = $1 FOR UPDATE",
        )
        .bind(id_orden)
        .fetch_optional(&mut **tx)
        .await?;

        order.ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))
    }

    pub async fn insert_usage(
        tx: &mut Transaction<'_, Postgres>,
        id_orden: i32,
        id_repuesto: i32,
        cantidad: i32,
        precio_unitario: Decimal,
        subtotal: Decimal,
    ) -> Result<PartUsage, AppError> {
        let usage = sqlx::query_as::<_, PartUsage>(
            r#"
            INSERT INTO uso_repuesto (id_orden, id_repuesto, cantidad, precio_unitario, subtotal)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id_orden)
        .bind(id_repuesto)
        .bind(cantidad)
        .bind(precio_unitario)
        .bind(subtotal)
        .fetch_one(&mut **tx)
        .await?;

        Ok(usage)
    }

    /// Buscar una línea de uso dentro de una orden concreta
    pub async fn find_usage(
        tx: &mut Transaction<'_, Postgres>,
        id_orden: i32,
        id_uso: i32,
    ) -> Result<Option<PartUsage>, AppError> {
        let usage = sqlx::query_as::<_, PartUsage>(
            "SELECT * FROM uso_repuesto WHERE id_uso = $1 AND id_orden = $2 FOR UPDATE",
        )
        .bind(id_uso)
        .bind(id_orden)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(usage)
    }

    pub async fn delete_usage(
        tx: &mut Transaction<'_, Postgres>,
        id_uso: i32,
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM uso_repuesto WHERE id_uso = $1")
            .bind(id_uso)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Recalcular y persistir el costo total de la orden:
    /// costo_total = costo_mano_obra + Σ(subtotal). Sin líneas de uso,
    /// el total vuelve a ser solo la mano de obra.
    pub async fn recompute_total(
        tx: &mut Transaction<'_, Postgres>,
        id_orden: i32,
    ) -> Result<Decimal, AppError> {
        let (costo_total,): (Decimal,) = sqlx::query_as(
            r#"
            UPDATE orden_servicio o
            SET costo_total = o.costo_mano_obra + COALESCE(
                (SELECT SUM(u.subtotal) FROM uso_repuesto u WHERE u.id_orden = o.id_orden), 0)
            WHERE o.id_orden = $1
            RETURNING o.costo_total
            "#,
        )
        .bind(id_orden)
        .fetch_one(&mut **tx)
        .await?;

        Ok(costo_total)
    }

    /// Actualizar los campos descriptivos y, opcionalmente, la mano de obra
    pub async fn update_fields(
        tx: &mut Transaction<'_, Postgres>,
        id_orden: i32,
        diagnostico: Option<&str>,
        costo_mano_obra: Option<Decimal>,
        observaciones: Option<&str>,
        fecha_estimada: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE orden_servicio
            SET diagnostico = COALESCE($2, diagnostico),
                costo_mano_obra = COALESCE($3, costo_mano_obra),
                observaciones = COALESCE($4, observaciones),
                fecha_estimada = COALESCE($5, fecha_estimada)
            WHERE id_orden = $1
            "#,
        )
        .bind(id_orden)
        .bind(diagnostico)
        .bind(costo_mano_obra)
        .bind(observaciones)
        .bind(fecha_estimada)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Leer la orden completa dentro de la transacción actual
    pub async fn fetch_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id_orden: i32,
    ) -> Result<ServiceOrder, AppError> {
        let order =
            sqlx::query_as::<_, ServiceOrder>("SELECT * FROM orden_servicio WHERE id_orden = $1")
                .bind(id_orden)
                .fetch_optional(&mut **tx)
                .await?;

        order.ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))
    }

    /// Cambiar el estado de la orden dentro de la transacción actual. Al
    /// entrar a `finalizado` se estampa la fecha de finalización (semántica
    /// de última escritura).
    pub async fn update_status(
        tx: &mut Transaction<'_, Postgres>,
        id_orden: i32,
        estado: &str,
        observaciones: Option<&str>,
        stamp_completion: bool,
    ) -> Result<ServiceOrder, AppError> {
        let order = sqlx::query_as::<_, ServiceOrder>(
            r#"
            UPDATE orden_servicio
            SET estado = $2,
                observaciones = COALESCE($3, observaciones),
                fecha_finalizacion = CASE WHEN $4 THEN CURRENT_TIMESTAMP ELSE fecha_finalizacion END
            WHERE id_orden = $1
            RETURNING *
            "#,
        )
        .bind(id_orden)
        .bind(estado)
        .bind(observaciones)
        .bind(stamp_completion)
        .fetch_optional(&mut **tx)
        .await?;

        order.ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))
    }
}
