//! Repositorio de repuestos y ledger de inventario
//!
//! El ledger (`reserve`/`release`) es el único camino por el que el
//! procesamiento de órdenes toca `stock_actual`. Ambas operaciones corren
//! sobre la transacción del llamador y `reserve` bloquea la fila del
//! repuesto (`FOR UPDATE`) para serializar el check-and-decrement frente a
//! reservas concurrentes sobre el mismo repuesto.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::part::Part;
use crate::utils::errors::{is_unique_violation, AppError};

/// Fila mínima que necesita el ledger para decidir una reserva
#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    precio_unitario: Decimal,
    stock_actual: i32,
    activo: bool,
}

pub struct PartRepository {
    pool: PgPool,
}

impl PartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== Ledger de inventario ====================

    /// Reservar `cantidad` unidades de un repuesto, decrementando el stock.
    /// Devuelve el precio unitario al momento de la reserva (snapshot).
    pub async fn reserve(
        tx: &mut Transaction<'_, Postgres>,
        id_repuesto: i32,
        cantidad: i32,
    ) -> Result<Decimal, AppError> {
        if cantidad <= 0 {
            return Err(AppError::Validation(
                "La cantidad debe ser mayor a 0".to_string(),
            ));
        }

        let row: Option<StockRow> = sqlx::query_as(
            "SELECT precio_unitario, stock_actual, activo FROM repuesto WHERE id_repuesto = $1 FOR UPDATE",
        )
        .bind(id_repuesto)
        .fetch_optional(&mut **tx)
        .await?;

        let row = row.ok_or_else(|| AppError::NotFound("Repuesto no encontrado".to_string()))?;

        if !row.activo {
            return Err(AppError::Validation(
                "El repuesto no está activo".to_string(),
            ));
        }

        if row.stock_actual < cantidad {
            return Err(AppError::InsufficientStock {
                available: row.stock_actual,
            });
        }

        sqlx::query("UPDATE repuesto SET stock_actual = stock_actual - $1 WHERE id_repuesto = $2")
            .bind(cantidad)
            .bind(id_repuesto)
            .execute(&mut **tx)
            .await?;

        Ok(row.precio_unitario)
    }

    /// Devolver `cantidad` unidades al stock de un repuesto.
    ///
    /// No hay cota superior: devolver más de lo reservado se acepta. Si
    /// algún día se quiere acotar, este es el único punto a tocar.
    pub async fn release(
        tx: &mut Transaction<'_, Postgres>,
        id_repuesto: i32,
        cantidad: i32,
    ) -> Result<(), AppError> {
        if cantidad <= 0 {
            return Err(AppError::Validation(
                "La cantidad debe ser mayor a 0".to_string(),
            ));
        }

        sqlx::query("UPDATE repuesto SET stock_actual = stock_actual + $1 WHERE id_repuesto = $2")
            .bind(cantidad)
            .bind(id_repuesto)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    // ==================== CRUD administrativo ====================

    pub async fn find_all_active(&self) -> Result<Vec<Part>, AppError> {
        let parts = sqlx::query_as::<_, Part>(
            "SELECT * FROM repuesto WHERE activo = true ORDER BY nombre",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(parts)
    }

    pub async fn find_by_id(&self, id_repuesto: i32) -> Result<Option<Part>, AppError> {
        let part = sqlx::query_as::<_, Part>("SELECT * FROM repuesto WHERE id_repuesto = $1")
            .bind(id_repuesto)
            .fetch_optional(&self.pool)
            .await?;

        Ok(part)
    }

    pub async fn find_low_stock(&self) -> Result<Vec<Part>, AppError> {
        let parts = sqlx::query_as::<_, Part>(
            "SELECT * FROM repuesto WHERE stock_actual <= stock_minimo AND activo = true ORDER BY stock_actual",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(parts)
    }

    pub async fn create(
        &self,
        codigo: &str,
        nombre: &str,
        descripcion: Option<&str>,
        marca: Option<&str>,
        precio_unitario: Decimal,
        stock_actual: i32,
        stock_minimo: i32,
        unidad_medida: &str,
    ) -> Result<Part, AppError> {
        let part = sqlx::query_as::<_, Part>(
            r#"
            INSERT INTO repuesto
                (codigo, nombre, descripcion, marca, precio_unitario, stock_actual, stock_minimo, unidad_medida)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(codigo)
        .bind(nombre)
        .bind(descripcion.unwrap_or(""))
        .bind(marca.unwrap_or(""))
        .bind(precio_unitario)
        .bind(stock_actual)
        .bind(stock_minimo)
        .bind(unidad_medida)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("El código ya está registrado".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(part)
    }

    pub async fn update(
        &self,
        id_repuesto: i32,
        codigo: &str,
        nombre: &str,
        descripcion: Option<&str>,
        marca: Option<&str>,
        precio_unitario: Decimal,
        stock_actual: i32,
        stock_minimo: i32,
        unidad_medida: &str,
    ) -> Result<Part, AppError> {
        let part = sqlx::query_as::<_, Part>(
            r#"
            UPDATE repuesto
            SET codigo = $1, nombre = $2, descripcion = $3, marca = $4,
                precio_unitario = $5, stock_actual = $6, stock_minimo = $7, unidad_medida = $8
            WHERE id_repuesto = $9
            RETURNING *
            "#,
        )
        .bind(codigo)
        .bind(nombre)
        .bind(descripcion)
        .bind(marca)
        .bind(precio_unitario)
        .bind(stock_actual)
        .bind(stock_minimo)
        .bind(unidad_medida)
        .bind(id_repuesto)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("El código ya está registrado".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        part.ok_or_else(|| AppError::NotFound("Repuesto no encontrado".to_string()))
    }

    /// Ajuste administrativo directo del stock (no pasa por el ledger)
    pub async fn set_stock(&self, id_repuesto: i32, stock_actual: i32) -> Result<Part, AppError> {
        let part = sqlx::query_as::<_, Part>(
            "UPDATE repuesto SET stock_actual = $1 WHERE id_repuesto = $2 RETURNING *",
        )
        .bind(stock_actual)
        .bind(id_repuesto)
        .fetch_optional(&self.pool)
        .await?;

        part.ok_or_else(|| AppError::NotFound("Repuesto no encontrado".to_string()))
    }

    /// Soft delete: el repuesto deja de estar disponible para nuevas reservas
    pub async fn deactivate(&self, id_repuesto: i32) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE repuesto SET activo = false WHERE id_repuesto = $1")
                .bind(id_repuesto)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Repuesto no encontrado".to_string()));
        }

        Ok(())
    }
}
