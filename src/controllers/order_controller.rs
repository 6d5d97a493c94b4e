//! Controller de órdenes de servicio
//!
//! Orquesta el flujo de costos: cada mutación pasa por la puerta de la
//! máquina de estados, delega en el ledger de inventario cuando toca
//! repuestos y recalcula el costo total, todo dentro de una sola
//! transacción. Un fallo en cualquier paso revierte la operación completa:
//! nunca queda stock descontado sin línea de uso, ni línea sin descuento
//! de stock.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::order_dto::{
    AddPartRequest, CreateOrderRequest, OrderCostResponse, OrderDetailResponse,
    UpdateOrderRequest, UpdateOrderStatusRequest,
};
use crate::models::order::{line_subtotal, OrderStatus, OrderSummary, ServiceOrder};
use crate::repositories::order_repository::OrderRepository;
use crate::repositories::part_repository::PartRepository;
use crate::utils::errors::AppError;

pub struct OrderController {
    pool: PgPool,
    repository: OrderRepository,
    strict_transitions: bool,
}

impl OrderController {
    pub fn new(pool: PgPool, strict_transitions: bool) -> Self {
        Self {
            repository: OrderRepository::new(pool.clone()),
            pool,
            strict_transitions,
        }
    }

    pub async fn list(&self, id_cliente: Option<i32>) -> Result<Vec<OrderSummary>, AppError> {
        self.repository.find_all(id_cliente).await
    }

    pub async fn get_detail(&self, id_orden: i32) -> Result<OrderDetailResponse, AppError> {
        let orden = self
            .repository
            .find_detail(id_orden)
            .await?
            .ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))?;

        let repuestos = self.repository.find_usages(id_orden).await?;

        Ok(OrderDetailResponse { orden, repuestos })
    }

    pub async fn create(&self, request: CreateOrderRequest) -> Result<ServiceOrder, AppError> {
        let costo_mano_obra = request.costo_mano_obra.unwrap_or(Decimal::ZERO);
        if costo_mano_obra < Decimal::ZERO {
            return Err(AppError::Validation(
                "El costo de mano de obra no puede ser negativo".to_string(),
            ));
        }

        let estado = match request.estado.as_deref() {
            Some(value) => OrderStatus::parse(value)?,
            None => OrderStatus::Diagnostico,
        };

        // Una orden no puede nacer ya cerrada
        if estado.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "Una orden no puede crearse en estado {}",
                estado.as_str()
            )));
        }

        self.repository
            .create(
                request.id_vehiculo,
                request.diagnostico.as_deref().unwrap_or(""),
                costo_mano_obra,
                estado.as_str(),
                request.fecha_estimada,
                request.observaciones.as_deref().unwrap_or(""),
                request.id_mecanico,
            )
            .await
    }

    /// Actualizar campos descriptivos y, si viene, la mano de obra.
    /// Cambiar la mano de obra es una mutación de costos: exige orden
    /// abierta y recalcula el total.
    pub async fn update(
        &self,
        id_orden: i32,
        request: UpdateOrderRequest,
    ) -> Result<ServiceOrder, AppError> {
        if let Some(monto) = request.costo_mano_obra {
            if monto < Decimal::ZERO {
                return Err(AppError::Validation(
                    "El costo de mano de obra no puede ser negativo".to_string(),
                ));
            }
        }

        let mut tx = self.pool.begin().await?;

        let locked = OrderRepository::lock(&mut tx, id_orden).await?;
        if request.costo_mano_obra.is_some() {
            Self::ensure_open(&locked.estado)?;
        }

        OrderRepository::update_fields(
            &mut tx,
            id_orden,
            request.diagnostico.as_deref(),
            request.costo_mano_obra,
            request.observaciones.as_deref(),
            request.fecha_estimada,
        )
        .await?;

        if request.costo_mano_obra.is_some() {
            OrderRepository::recompute_total(&mut tx, id_orden).await?;
        }

        let order = OrderRepository::fetch_in_tx(&mut tx, id_orden).await?;
        tx.commit().await?;

        Ok(order)
    }

    pub async fn update_status(
        &self,
        id_orden: i32,
        request: UpdateOrderStatusRequest,
    ) -> Result<ServiceOrder, AppError> {
        let target = OrderStatus::parse(&request.estado)?;

        let mut tx = self.pool.begin().await?;

        // La transición se valida contra la fila bloqueada: dos peticiones
        // concurrentes no pueden pasar ambas la validación con un estado
        // ya obsoleto.
        let locked = OrderRepository::lock(&mut tx, id_orden).await?;
        let current = OrderStatus::parse(&locked.estado)?;

        if !current.can_transition_to(target, self.strict_transitions) {
            return Err(AppError::InvalidState(format!(
                "Transición no permitida: {} → {}",
                current.as_str(),
                target.as_str()
            )));
        }

        let stamp_completion = target == OrderStatus::Finalizado;

        let order = OrderRepository::update_status(
            &mut tx,
            id_orden,
            target.as_str(),
            request.observaciones.as_deref(),
            stamp_completion,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Orden {} cambió de estado: {} → {}",
            id_orden,
            current.as_str(),
            target.as_str()
        );

        Ok(order)
    }

    /// Agregar un repuesto a la orden: reserva stock, registra la línea con
    /// el precio snapshot y recalcula el total.
    pub async fn add_part(
        &self,
        id_orden: i32,
        request: AddPartRequest,
    ) -> Result<OrderCostResponse, AppError> {
        if request.cantidad <= 0 {
            return Err(AppError::Validation(
                "Repuesto y cantidad válida son obligatorios".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let locked = OrderRepository::lock(&mut tx, id_orden).await?;
        Self::ensure_open(&locked.estado)?;

        let precio =
            PartRepository::reserve(&mut tx, request.id_repuesto, request.cantidad).await?;
        let subtotal = line_subtotal(request.cantidad, precio);

        OrderRepository::insert_usage(
            &mut tx,
            id_orden,
            request.id_repuesto,
            request.cantidad,
            precio,
            subtotal,
        )
        .await?;

        let costo_total = OrderRepository::recompute_total(&mut tx, id_orden).await?;
        let orden = OrderRepository::fetch_in_tx(&mut tx, id_orden).await?;

        tx.commit().await?;

        Ok(OrderCostResponse {
            message: "Repuesto agregado exitosamente".to_string(),
            costo_total,
            orden,
        })
    }

    /// Quitar una línea de repuesto: devuelve el stock, elimina la línea y
    /// recalcula el total.
    pub async fn remove_part(
        &self,
        id_orden: i32,
        id_uso: i32,
    ) -> Result<OrderCostResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked = OrderRepository::lock(&mut tx, id_orden).await?;
        Self::ensure_open(&locked.estado)?;

        let usage = OrderRepository::find_usage(&mut tx, id_orden, id_uso)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Repuesto no encontrado en esta orden".to_string())
            })?;

        PartRepository::release(&mut tx, usage.id_repuesto, usage.cantidad).await?;
        OrderRepository::delete_usage(&mut tx, id_uso).await?;

        let costo_total = OrderRepository::recompute_total(&mut tx, id_orden).await?;
        let orden = OrderRepository::fetch_in_tx(&mut tx, id_orden).await?;

        tx.commit().await?;

        Ok(OrderCostResponse {
            message: "Repuesto eliminado exitosamente".to_string(),
            costo_total,
            orden,
        })
    }

    /// Fijar la mano de obra y recalcular el total
    pub async fn set_labor_cost(
        &self,
        id_orden: i32,
        monto: Decimal,
    ) -> Result<OrderCostResponse, AppError> {
        if monto < Decimal::ZERO {
            return Err(AppError::Validation(
                "El costo de mano de obra no puede ser negativo".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let locked = OrderRepository::lock(&mut tx, id_orden).await?;
        Self::ensure_open(&locked.estado)?;

        OrderRepository::update_fields(&mut tx, id_orden, None, Some(monto), None, None).await?;
        let costo_total = OrderRepository::recompute_total(&mut tx, id_orden).await?;
        let orden = OrderRepository::fetch_in_tx(&mut tx, id_orden).await?;

        tx.commit().await?;

        Ok(OrderCostResponse {
            message: "Mano de obra actualizada exitosamente".to_string(),
            costo_total,
            orden,
        })
    }

    /// Las órdenes en estado terminal no admiten mutaciones de costo
    fn ensure_open(estado: &str) -> Result<(), AppError> {
        let status = OrderStatus::parse(estado)?;
        if status.is_closed() {
            return Err(AppError::OrderClosed(estado.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_open_rejects_terminal_states() {
        assert!(matches!(
            OrderController::ensure_open("entregado"),
            Err(AppError::OrderClosed(_))
        ));
        assert!(matches!(
            OrderController::ensure_open("cancelado"),
            Err(AppError::OrderClosed(_))
        ));
    }

    #[test]
    fn ensure_open_accepts_active_states() {
        assert!(OrderController::ensure_open("diagnostico").is_ok());
        assert!(OrderController::ensure_open("reparando").is_ok());
        assert!(OrderController::ensure_open("finalizado").is_ok());
    }

    // ==================== Tests contra Postgres ====================

    async fn setup(pool: &PgPool) -> (i32, i32) {
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

        let (id_repuesto,): (i32,) = sqlx::query_as(
            "INSERT INTO repuesto (codigo, nombre, precio_unitario, stock_actual) \
             VALUES ('REP100', 'Filtro de Aceite', 25000, 50) RETURNING id_repuesto",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        (id_vehiculo, id_repuesto)
    }

    async fn new_order(controller: &OrderController, id_vehiculo: i32) -> ServiceOrder {
        controller
            .create(CreateOrderRequest {
                id_vehiculo,
                diagnostico: Some("Cambio de aceite".to_string()),
                costo_mano_obra: Some(Decimal::new(100000, 0)),
                estado: None,
                fecha_estimada: None,
                observaciones: None,
                id_mecanico: None,
            })
            .await
            .unwrap()
    }

    async fn stock_of(pool: &PgPool, id_repuesto: i32) -> i32 {
        let (stock,): (i32,) =
            sqlx::query_as("SELECT stock_actual FROM repuesto WHERE id_repuesto = $1")
                .bind(id_repuesto)
                .fetch_one(pool)
                .await
                .unwrap();
        stock
    }

    async fn total_of(pool: &PgPool, id_orden: i32) -> Decimal {
        let (total,): (Decimal,) =
            sqlx::query_as("SELECT costo_total FROM orden_servicio WHERE id_orden = $1")
                .bind(id_orden)
                .fetch_one(pool)
                .await
                .unwrap();
        total
    }

    #[sqlx::test]
    async fn add_part_reserves_stock_and_accumulates_total(pool: PgPool) {
        let (id_vehiculo, id_repuesto) = setup(&pool).await;
        let controller = OrderController::new(pool.clone(), false);
        let orden = new_order(&controller, id_vehiculo).await;

        let result = controller
            .add_part(
                orden.id_orden,
                AddPartRequest {
                    id_repuesto,
                    cantidad: 10,
                },
            )
            .await
            .unwrap();

        // mano de obra 100000 + 10 × 25000
        assert_eq!(result.costo_total, Decimal::new(350000, 0));
        assert_eq!(stock_of(&pool, id_repuesto).await, 40);
    }

    #[sqlx::test]
    async fn failed_add_leaves_stock_and_total_untouched(pool: PgPool) {
        let (id_vehiculo, id_repuesto) = setup(&pool).await;
        let controller = OrderController::new(pool.clone(), false);
        let orden = new_order(&controller, id_vehiculo).await;

        let result = controller
            .add_part(
                orden.id_orden,
                AddPartRequest {
                    id_repuesto,
                    cantidad: 60,
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::InsufficientStock { available: 50 })
        ));
        assert_eq!(stock_of(&pool, id_repuesto).await, 50);
        assert_eq!(total_of(&pool, orden.id_orden).await, Decimal::new(100000, 0));

        let (lineas,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM uso_repuesto WHERE id_orden = $1")
                .bind(orden.id_orden)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(lineas, 0);
    }

    #[sqlx::test]
    async fn remove_part_restores_stock_and_total(pool: PgPool) {
        let (id_vehiculo, id_repuesto) = setup(&pool).await;
        let controller = OrderController::new(pool.clone(), false);
        let orden = new_order(&controller, id_vehiculo).await;

        controller
            .add_part(
                orden.id_orden,
                AddPartRequest {
                    id_repuesto,
                    cantidad: 10,
                },
            )
            .await
            .unwrap();

        let (id_uso,): (i32,) =
            sqlx::query_as("SELECT id_uso FROM uso_repuesto WHERE id_orden = $1")
                .bind(orden.id_orden)
                .fetch_one(&pool)
                .await
                .unwrap();

        let result = controller.remove_part(orden.id_orden, id_uso).await.unwrap();

        assert_eq!(result.costo_total, Decimal::new(100000, 0));
        assert_eq!(stock_of(&pool, id_repuesto).await, 50);
    }

    #[sqlx::test]
    async fn strict_transition_is_checked_against_current_row_state(pool: PgPool) {
        let (id_vehiculo, _) = setup(&pool).await;
        let controller = OrderController::new(pool.clone(), true);
        let orden = new_order(&controller, id_vehiculo).await;

        controller
            .update_status(
                orden.id_orden,
                UpdateOrderStatusRequest {
                    estado: "cancelado".to_string(),
                    observaciones: None,
                },
            )
            .await
            .unwrap();

        // Una vez cancelada, la orden no puede resucitar a reparando
        let result = controller
            .update_status(
                orden.id_orden,
                UpdateOrderStatusRequest {
                    estado: "reparando".to_string(),
                    observaciones: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidState(_))));
        assert_eq!(
            controller.get_detail(orden.id_orden).await.unwrap().orden.estado,
            "cancelado"
        );
    }

    #[sqlx::test]
    async fn create_rejects_terminal_initial_state(pool: PgPool) {
        let (id_vehiculo, _) = setup(&pool).await;
        let controller = OrderController::new(pool.clone(), false);

        for estado in ["entregado", "cancelado"] {
            let result = controller
                .create(CreateOrderRequest {
                    id_vehiculo,
                    diagnostico: None,
                    costo_mano_obra: None,
                    estado: Some(estado.to_string()),
                    fecha_estimada: None,
                    observaciones: None,
                    id_mecanico: None,
                })
                .await;

            assert!(matches!(result, Err(AppError::InvalidState(_))));
        }
    }
}
