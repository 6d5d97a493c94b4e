use axum::{extract::State, routing::get, Json, Router};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[derive(Debug, Serialize)]
pub struct WorkshopStats {
    pub total_clientes: i64,
    pub total_ordenes: i64,
    pub ordenes_activas: i64,
    pub ingresos_mes: Decimal,
}

pub fn create_stats_router() -> Router<AppState> {
    Router::new().route("/", get(get_stats))
}

/// Resumen del taller para el panel de administración.
async fn get_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<WorkshopStats>, AppError> {
    user.require_admin()?;

    let total_clientes: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM cliente WHERE activo = true")
            .fetch_one(&state.pool)
            .await?;

    let total_ordenes: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orden_servicio")
        .fetch_one(&state.pool)
        .await?;

    let ordenes_activas: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM orden_servicio WHERE estado IN ('diagnostico', 'reparando')",
    )
    .fetch_one(&state.pool)
    .await?;

    let ingresos_mes: (Decimal,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(total), 0)
        FROM factura
        WHERE estado = 'pagada'
          AND fecha_emision >= DATE_TRUNC('month', CURRENT_DATE)
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(WorkshopStats {
        total_clientes: total_clientes.0,
        total_ordenes: total_ordenes.0,
        ordenes_activas: ordenes_activas.0,
        ingresos_mes: ingresos_mes.0,
    }))
}
