use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post, put},
    Json, Router,
};

use crate::controllers::invoice_controller::InvoiceController;
use crate::controllers::order_controller::OrderController;
use crate::dto::order_dto::{
    AddPartRequest, CreateOrderRequest, OrderCostResponse, OrderDetailResponse,
    SetLaborCostRequest, UpdateOrderRequest, UpdateOrderStatusRequest,
};
use crate::middleware::auth::CurrentUser;
use crate::models::invoice::Invoice;
use crate::models::order::{OrderSummary, ServiceOrder};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/", post(create_order))
        .route("/:id", get(get_order))
        .route("/:id", put(update_order))
        .route("/:id/estado", patch(update_order_status))
        .route("/:id/mano-obra", patch(set_labor_cost))
        .route("/:id/repuestos", post(add_part))
        .route("/:id/repuestos/:id_uso", delete(remove_part))
        .route("/:id/factura", get(get_order_invoice))
}

fn order_controller(state: &AppState) -> OrderController {
    OrderController::new(state.pool.clone(), state.config.strict_transitions)
}

/// Los clientes solo ven sus propias órdenes; el personal las ve todas.
async fn list_orders(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<OrderSummary>>, AppError> {
    let response = order_controller(&state).list(user.client_scope()).await?;
    Ok(Json(response))
}

async fn get_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<OrderDetailResponse>, AppError> {
    let response = order_controller(&state).get_detail(id).await?;
    if let Some(id_cliente) = user.client_scope() {
        if response.orden.id_cliente != id_cliente {
            return Err(AppError::Forbidden(
                "Acceso denegado. Solo puede consultar sus propias órdenes.".to_string(),
            ));
        }
    }
    Ok(Json(response))
}

async fn create_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<ServiceOrder>, AppError> {
    user.require_staff()?;
    let response = order_controller(&state).create(request).await?;
    Ok(Json(response))
}

async fn update_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<ServiceOrder>, AppError> {
    user.require_staff()?;
    let response = order_controller(&state).update(id, request).await?;
    Ok(Json(response))
}

async fn update_order_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ServiceOrder>, AppError> {
    user.require_staff()?;
    let response = order_controller(&state).update_status(id, request).await?;
    Ok(Json(response))
}

async fn set_labor_cost(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<SetLaborCostRequest>,
) -> Result<Json<OrderCostResponse>, AppError> {
    user.require_staff()?;
    let response = order_controller(&state)
        .set_labor_cost(id, request.costo_mano_obra)
        .await?;
    Ok(Json(response))
}

async fn add_part(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<AddPartRequest>,
) -> Result<Json<OrderCostResponse>, AppError> {
    user.require_staff()?;
    let response = order_controller(&state).add_part(id, request).await?;
    Ok(Json(response))
}

async fn remove_part(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, id_uso)): Path<(i32, i32)>,
) -> Result<Json<OrderCostResponse>, AppError> {
    user.require_staff()?;
    let response = order_controller(&state).remove_part(id, id_uso).await?;
    Ok(Json(response))
}

async fn get_order_invoice(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Invoice>, AppError> {
    user.require_staff()?;
    let controller = InvoiceController::new(state.pool.clone());
    let response = controller.get_by_order(id).await?;
    Ok(Json(response))
}
