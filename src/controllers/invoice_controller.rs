//! Controller de facturas
//!
//! Emitir una factura toma un snapshot del costo total de la orden en ese
//! momento; ediciones posteriores de la orden no tocan la factura emitida.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::invoice_dto::{CreateInvoiceRequest, UpdateInvoiceStatusRequest};
use crate::models::invoice::{Invoice, InvoiceAmounts, InvoiceStatus, InvoiceSummary};
use crate::repositories::invoice_repository::InvoiceRepository;
use crate::utils::errors::AppError;

pub struct InvoiceController {
    pool: PgPool,
    repository: InvoiceRepository,
}

impl InvoiceController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InvoiceRepository::new(pool.clone()),
            pool,
        }
    }

    /// Emitir la factura de una orden (a lo sumo una por orden)
    pub async fn issue(&self, request: CreateInvoiceRequest) -> Result<Invoice, AppError> {
        let descuento = request.descuento.unwrap_or(Decimal::ZERO);
        if descuento < Decimal::ZERO {
            return Err(AppError::Validation(
                "El descuento no puede ser negativo".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        // El costo de la orden se lee con la fila bloqueada para que una
        // mutación concurrente no cambie el subtotal entre lectura e
        // inserción.
        let row: Option<(Decimal,)> = sqlx::query_as(
            "SELECT costo_total FROM orden_servicio WHERE id_orden = $1 FOR UPDATE",
        )
        .bind(request.id_orden)
        .fetch_optional(&mut *tx)
        .await?;

        let (subtotal,) =
            row.ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))?;

        if InvoiceRepository::exists_for_order(&mut tx, request.id_orden).await? {
            return Err(AppError::DuplicateInvoice);
        }

        let amounts = InvoiceAmounts::compute(subtotal, descuento);

        let invoice = InvoiceRepository::insert(
            &mut tx,
            request.id_orden,
            amounts.subtotal,
            amounts.iva,
            amounts.descuento,
            amounts.total,
            request.metodo_pago.as_deref(),
            request.observaciones.as_deref(),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Factura {} emitida para la orden {} (total: {})",
            invoice.id_factura,
            invoice.id_orden,
            invoice.total
        );

        Ok(invoice)
    }

    pub async fn get_by_order(&self, id_orden: i32) -> Result<Invoice, AppError> {
        self.repository
            .find_by_order(id_orden)
            .await?
            .ok_or_else(|| AppError::NotFound("Factura no encontrada".to_string()))
    }

    pub async fn list(&self, id_cliente: Option<i32>) -> Result<Vec<InvoiceSummary>, AppError> {
        self.repository.find_all(id_cliente).await
    }

    pub async fn update_status(
        &self,
        id_factura: i32,
        request: UpdateInvoiceStatusRequest,
    ) -> Result<Invoice, AppError> {
        let estado = InvoiceStatus::parse(&request.estado)?;
        self.repository
            .update_status(id_factura, estado.as_str())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn order_with_cost(pool: &PgPool) -> i32 {
        crate::database::migrations::run(pool).await.unwrap();

        let (id_cliente,): (i32,) = sqlx::query_as(
            "INSERT INTO cliente (nombre, telefono, correo) \
             VALUES ('Laura Ruiz', '3000000001', 'lruiz@email.com') RETURNING id_cliente",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        let (id_vehiculo,): (i32,) = sqlx::query_as(
            "INSERT INTO vehiculo (placa, marca, modelo, anio, id_cliente) \
             VALUES ('ABC123', 'Mazda', '3', 2020, $1) RETURNING id_vehiculo",
        )
        .bind(id_cliente)
        .fetch_one(pool)
        .await
        .unwrap();

        let (id_orden,): (i32,) = sqlx::query_as(
            "INSERT INTO orden_servicio (id_vehiculo, costo_mano_obra, costo_total) \
             VALUES ($1, 350000, 350000) RETURNING id_orden",
        )
        .bind(id_vehiculo)
        .fetch_one(pool)
        .await
        .unwrap();

        id_orden
    }

    fn request_for(id_orden: i32) -> CreateInvoiceRequest {
        CreateInvoiceRequest {
            id_orden,
            metodo_pago: None,
            descuento: None,
            observaciones: None,
        }
    }

    #[sqlx::test]
    async fn issue_snapshots_order_cost_with_iva(pool: PgPool) {
        let id_orden = order_with_cost(&pool).await;
        let controller = InvoiceController::new(pool.clone());

        let factura = controller.issue(request_for(id_orden)).await.unwrap();

        assert_eq!(factura.subtotal, Decimal::new(350000, 0));
        assert_eq!(factura.iva, Decimal::new(66500, 0));
        assert_eq!(factura.total, Decimal::new(416500, 0));
        assert_eq!(factura.estado, "pendiente");
    }

    #[sqlx::test]
    async fn second_issue_for_same_order_is_rejected(pool: PgPool) {
        let id_orden = order_with_cost(&pool).await;
        let controller = InvoiceController::new(pool.clone());

        controller.issue(request_for(id_orden)).await.unwrap();
        let result = controller.issue(request_for(id_orden)).await;

        assert!(matches!(result, Err(AppError::DuplicateInvoice)));

        let (facturas,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM factura WHERE id_orden = $1")
                .bind(id_orden)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(facturas, 1);
    }
}
