use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde_json::json;

use crate::controllers::user_controller::UserController;
use crate::dto::user_dto::{CreateUserRequest, ResetPasswordRequest, UpdateUserRequest};
use crate::middleware::auth::CurrentUser;
use crate::models::user::UserPublic;
use crate::state::AppState;
use crate::utils::errors::AppError;

// Gestión de cuentas: solo administradores.
pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/:id", get(get_user))
        .route("/:id", put(update_user))
        .route("/:id", delete(deactivate_user))
        .route("/:id/activar", patch(activate_user))
        .route("/:id/password", patch(reset_password))
}

async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<UserPublic>>, AppError> {
    user.require_admin()?;
    let controller = UserController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<UserPublic>, AppError> {
    user.require_admin()?;
    let controller = UserController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<UserPublic>, AppError> {
    user.require_admin()?;
    let controller = UserController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserPublic>, AppError> {
    user.require_admin()?;
    let controller = UserController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn reset_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_admin()?;
    let controller = UserController::new(state.pool.clone());
    controller.reset_password(id, request).await?;
    Ok(Json(json!({ "message": "Contraseña restablecida exitosamente" })))
}

async fn deactivate_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_admin()?;
    let controller = UserController::new(state.pool.clone());
    controller.deactivate(id).await?;
    Ok(Json(json!({ "message": "Usuario desactivado exitosamente" })))
}

async fn activate_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_admin()?;
    let controller = UserController::new(state.pool.clone());
    controller.activate(id).await?;
    Ok(Json(json!({ "message": "Usuario activado exitosamente" })))
}
