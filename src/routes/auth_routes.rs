use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::middleware::auth::CurrentUser;
use crate::models::user::UserPublic;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/profile", get(profile))
        .route("/change-password", post(change_password))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<UserPublic>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let response = controller.profile(user.id).await?;
    Ok(Json(response))
}

async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    controller.change_password(user.id, request).await?;
    Ok(Json(json!({
        "message": "Contraseña actualizada exitosamente"
    })))
}
