//! Repositorio de vehículos

use sqlx::PgPool;

use crate::models::vehicle::{Vehicle, VehicleWithClient};
use crate::utils::errors::{is_foreign_key_violation, is_unique_violation, AppError};

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<VehicleWithClient>, AppError> {
        let vehicles = sqlx::query_as::<_, VehicleWithClient>(
            r#"
            SELECT v.*, c.nombre AS cliente_nombre, c.telefono AS cliente_telefono,
                   c.correo AS cliente_correo
            FROM vehiculo v
            JOIN cliente c ON v.id_cliente = c.id_cliente
            ORDER BY v.id_vehiculo DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn find_by_id(&self, id_vehiculo: i32) -> Result<Option<VehicleWithClient>, AppError> {
        let vehicle = sqlx::query_as::<_, VehicleWithClient>(
            r#"
            SELECT v.*, c.nombre AS cliente_nombre, c.telefono AS cliente_telefono,
                   c.correo AS cliente_correo
            FROM vehiculo v
            JOIN cliente c ON v.id_cliente = c.id_cliente
            WHERE v.id_vehiculo = $1
            "#,
        )
        .bind(id_vehiculo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_client(&self, id_cliente: i32) -> Result<Vec<Vehicle>, AppError> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehiculo WHERE id_cliente = $1")
                .bind(id_cliente)
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        placa: &str,
        marca: &str,
        modelo: &str,
        anio: i32,
        color: Option<&str>,
        tipo_vehiculo: Option<&str>,
        kilometraje: i32,
        id_cliente: i32,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehiculo (placa, marca, modelo, anio, color, tipo_vehiculo, kilometraje, id_cliente)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(placa)
        .bind(marca)
        .bind(modelo)
        .bind(anio)
        .bind(color)
        .bind(tipo_vehiculo)
        .bind(kilometraje)
        .bind(id_cliente)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("La placa ya está registrada".to_string())
            } else if is_foreign_key_violation(&e) {
                AppError::Validation("Cliente no encontrado".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(vehicle)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id_vehiculo: i32,
        placa: &str,
        marca: &str,
        modelo: &str,
        anio: i32,
        color: Option<&str>,
        tipo_vehiculo: Option<&str>,
        kilometraje: i32,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehiculo
            SET placa = $1, marca = $2, modelo = $3, anio = $4,
                color = $5, tipo_vehiculo = $6, kilometraje = $7
            WHERE id_vehiculo = $8
            RETURNING *
            "#,
        )
        .bind(placa)
        .bind(marca)
        .bind(modelo)
        .bind(anio)
        .bind(color)
        .bind(tipo_vehiculo)
        .bind(kilometraje)
        .bind(id_vehiculo)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("La placa ya está registrada".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        vehicle.ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))
    }

    pub async fn delete(&self, id_vehiculo: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM vehiculo WHERE id_vehiculo = $1")
            .bind(id_vehiculo)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
        }

        Ok(())
    }
}
