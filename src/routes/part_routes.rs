use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde_json::json;

use crate::controllers::part_controller::PartController;
use crate::dto::part_dto::{CreatePartRequest, UpdatePartRequest, UpdateStockRequest};
use crate::middleware::auth::CurrentUser;
use crate::models::part::Part;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_part_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_parts))
        .route("/", post(create_part))
        .route("/bajo-stock", get(list_low_stock))
        .route("/:id", get(get_part))
        .route("/:id", put(update_part))
        .route("/:id", delete(deactivate_part))
        .route("/:id/stock", patch(set_stock))
}

async fn list_parts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Part>>, AppError> {
    user.require_staff()?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn list_low_stock(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Part>>, AppError> {
    user.require_staff()?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.list_low_stock().await?;
    Ok(Json(response))
}

async fn get_part(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Part>, AppError> {
    user.require_staff()?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_part(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreatePartRequest>,
) -> Result<Json<Part>, AppError> {
    user.require_admin()?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn update_part(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePartRequest>,
) -> Result<Json<Part>, AppError> {
    user.require_admin()?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn set_stock(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStockRequest>,
) -> Result<Json<Part>, AppError> {
    user.require_admin()?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.set_stock(id, request).await?;
    Ok(Json(response))
}

async fn deactivate_part(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_admin()?;
    let controller = PartController::new(state.pool.clone());
    controller.deactivate(id).await?;
    Ok(Json(json!({ "message": "Repuesto desactivado exitosamente" })))
}
