//! Repositorio de facturas
//!
//! La verificación de unicidad (una factura por orden) y la inserción
//! ocurren dentro de la misma transacción; la tabla además lleva UNIQUE
//! sobre id_orden como última línea de defensa.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::invoice::{Invoice, InvoiceSummary};
use crate::utils::errors::{is_unique_violation, AppError};

pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn exists_for_order(
        tx: &mut Transaction<'_, Postgres>,
        id_orden: i32,
    ) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM factura WHERE id_orden = $1)")
                .bind(id_orden)
                .fetch_one(&mut **tx)
                .await?;

        Ok(exists)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        id_orden: i32,
        subtotal: Decimal,
        iva: Decimal,
        descuento: Decimal,
        total: Decimal,
        metodo_pago: Option<&str>,
        observaciones: Option<&str>,
    ) -> Result<Invoice, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO factura (id_orden, subtotal, iva, descuento, total, metodo_pago, estado, observaciones)
            VALUES ($1, $2, $3, $4, $5, $6, 'pendiente', $7)
            RETURNING *
            "#,
        )
        .bind(id_orden)
        .bind(subtotal)
        .bind(iva)
        .bind(descuento)
        .bind(total)
        .bind(metodo_pago)
        .bind(observaciones)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateInvoice
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(invoice)
    }

    pub async fn find_by_order(&self, id_orden: i32) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM factura WHERE id_orden = $1")
            .bind(id_orden)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    pub async fn find_all(&self, id_cliente: Option<i32>) -> Result<Vec<InvoiceSummary>, AppError> {
        let base = r#"
            SELECT f.id_factura, f.id_orden, f.fecha_emision, f.estado, f.metodo_pago,
                   f.subtotal, f.iva, f.total,
                   o.id_vehiculo, v.placa, v.marca, v.modelo,
                   c.id_cliente, c.nombre AS cliente_nombre, o.diagnostico
            FROM factura f
            JOIN orden_servicio o ON f.id_orden = o.id_orden
            JOIN vehiculo v ON o.id_vehiculo = v.id_vehiculo
            JOIN cliente c ON v.id_cliente = c.id_cliente
        "#;

        let invoices = match id_cliente {
            // Un usuario cliente solo ve sus propias facturas
            Some(id) => {
                let query = format!("{} WHERE c.id_cliente = $1 ORDER BY f.id_factura DESC", base);
                sqlx::query_as::<_, InvoiceSummary>(&query)
                    .bind(id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!("{} ORDER BY f.id_factura DESC", base);
                sqlx::query_as::<_, InvoiceSummary>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(invoices)
    }

    pub async fn update_status(&self, id_factura: i32, estado: &str) -> Result<Invoice, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "UPDATE factura SET estado = $1 WHERE id_factura = $2 RETURNING *",
        )
        .bind(estado)
        .bind(id_factura)
        .fetch_optional(&self.pool)
        .await?;

        invoice.ok_or_else(|| AppError::NotFound("Factura no encontrada".to_string()))
    }
}
