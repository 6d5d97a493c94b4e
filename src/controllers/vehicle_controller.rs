//! Controller de vehículos

use sqlx::PgPool;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::models::vehicle::{Vehicle, VehicleWithClient};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<VehicleWithClient>, AppError> {
        self.repository.find_all().await
    }

    pub async fn get_by_id(&self, id_vehiculo: i32) -> Result<VehicleWithClient, AppError> {
        self.repository
            .find_by_id(id_vehiculo)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))
    }

    pub async fn list_by_client(&self, id_cliente: i32) -> Result<Vec<Vehicle>, AppError> {
        self.repository.find_by_client(id_cliente).await
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> Result<Vehicle, AppError> {
        request.validate()?;

        self.repository
            .create(
                &request.placa,
                &request.marca,
                &request.modelo,
                request.anio,
                request.color.as_deref(),
                request.tipo_vehiculo.as_deref(),
                request.kilometraje.unwrap_or(0),
                request.id_cliente,
            )
            .await
    }

    pub async fn update(
        &self,
        id_vehiculo: i32,
        request: UpdateVehicleRequest,
    ) -> Result<Vehicle, AppError> {
        request.validate()?;

        self.repository
            .update(
                id_vehiculo,
                &request.placa,
                &request.marca,
                &request.modelo,
                request.anio,
                request.color.as_deref(),
                request.tipo_vehiculo.as_deref(),
                request.kilometraje.unwrap_or(0),
            )
            .await
    }

    pub async fn delete(&self, id_vehiculo: i32) -> Result<(), AppError> {
        self.repository.delete(id_vehiculo).await
    }
}
