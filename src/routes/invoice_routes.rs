use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};

use crate::controllers::invoice_controller::InvoiceController;
use crate::dto::invoice_dto::{CreateInvoiceRequest, UpdateInvoiceStatusRequest};
use crate::middleware::auth::CurrentUser;
use crate::models::invoice::{Invoice, InvoiceSummary};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_invoice_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices))
        .route("/", post(issue_invoice))
        .route("/:id/estado", patch(update_invoice_status))
}

/// Los clientes solo ven las facturas de sus propias órdenes.
async fn list_invoices(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<InvoiceSummary>>, AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    let response = controller.list(user.client_scope()).await?;
    Ok(Json(response))
}

async fn issue_invoice(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<Json<Invoice>, AppError> {
    user.require_admin()?;
    let controller = InvoiceController::new(state.pool.clone());
    let response = controller.issue(request).await?;
    Ok(Json(response))
}

async fn update_invoice_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateInvoiceStatusRequest>,
) -> Result<Json<Invoice>, AppError> {
    user.require_admin()?;
    let controller = InvoiceController::new(state.pool.clone());
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}
