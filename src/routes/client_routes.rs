use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;

use crate::controllers::client_controller::ClientController;
use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::client_dto::{CreateClientRequest, UpdateClientRequest};
use crate::middleware::auth::CurrentUser;
use crate::models::client::Client;
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_client_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients))
        .route("/", post(create_client))
        .route("/:id", get(get_client))
        .route("/:id", put(update_client))
        .route("/:id", delete(deactivate_client))
        .route("/:id/vehiculos", get(list_client_vehicles))
}

async fn list_clients(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Client>>, AppError> {
    user.require_staff()?;
    let controller = ClientController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_client(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Client>, AppError> {
    user.require_staff()?;
    let controller = ClientController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_client(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateClientRequest>,
) -> Result<Json<Client>, AppError> {
    user.require_staff()?;
    let controller = ClientController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn update_client(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<Client>, AppError> {
    user.require_staff()?;
    let controller = ClientController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn deactivate_client(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_admin()?;
    let controller = ClientController::new(state.pool.clone());
    controller.deactivate(id).await?;
    Ok(Json(json!({ "message": "Cliente desactivado exitosamente" })))
}

async fn list_client_vehicles(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    // Un cliente solo puede consultar sus propios vehículos.
    if let Some(id_cliente) = user.client_scope() {
        if id_cliente != id {
            return Err(AppError::Forbidden(
                "Acceso denegado. Solo puede consultar sus propios vehículos.".to_string(),
            ));
        }
    }
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list_by_client(id).await?;
    Ok(Json(response))
}
