//! Controller de repuestos (catálogo e inventario administrativo)

use rust_decimal::Decimal;
use sqlx::PgPool;
use validator::Validate;

use crate::dto::part_dto::{CreatePartRequest, UpdatePartRequest, UpdateStockRequest};
use crate::models::part::Part;
use crate::repositories::part_repository::PartRepository;
use crate::utils::errors::AppError;

pub struct PartController {
    repository: PartRepository,
}

impl PartController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PartRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<Part>, AppError> {
        self.repository.find_all_active().await
    }

    pub async fn get_by_id(&self, id_repuesto: i32) -> Result<Part, AppError> {
        self.repository
            .find_by_id(id_repuesto)
            .await?
            .ok_or_else(|| AppError::NotFound("Repuesto no encontrado".to_string()))
    }

    /// Repuestos en o por debajo de su stock mínimo
    pub async fn list_low_stock(&self) -> Result<Vec<Part>, AppError> {
        self.repository.find_low_stock().await
    }

    pub async fn create(&self, request: CreatePartRequest) -> Result<Part, AppError> {
        request.validate()?;

        if request.precio_unitario <= Decimal::ZERO {
            return Err(AppError::Validation(
                "El precio debe ser mayor a 0".to_string(),
            ));
        }

        self.repository
            .create(
                &request.codigo,
                &request.nombre,
                request.descripcion.as_deref(),
                request.marca.as_deref(),
                request.precio_unitario,
                request.stock_actual.unwrap_or(0),
                request.stock_minimo.unwrap_or(5),
                request.unidad_medida.as_deref().unwrap_or("unidad"),
            )
            .await
    }

    pub async fn update(
        &self,
        id_repuesto: i32,
        request: UpdatePartRequest,
    ) -> Result<Part, AppError> {
        request.validate()?;

        if request.precio_unitario <= Decimal::ZERO {
            return Err(AppError::Validation(
                "El precio debe ser mayor a 0".to_string(),
            ));
        }

        self.repository
            .update(
                id_repuesto,
                &request.codigo,
                &request.nombre,
                request.descripcion.as_deref(),
                request.marca.as_deref(),
                request.precio_unitario,
                request.stock_actual,
                request.stock_minimo,
                &request.unidad_medida,
            )
            .await
    }

    /// Ajuste administrativo directo del stock (no pasa por el ledger)
    pub async fn set_stock(
        &self,
        id_repuesto: i32,
        request: UpdateStockRequest,
    ) -> Result<Part, AppError> {
        request.validate()?;
        self.repository
            .set_stock(id_repuesto, request.stock_actual)
            .await
    }

    pub async fn deactivate(&self, id_repuesto: i32) -> Result<(), AppError> {
        self.repository.deactivate(id_repuesto).await
    }
}
