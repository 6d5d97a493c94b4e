mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod utils;

use anyhow::Result;
use axum::{http::StatusCode, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 AutoTrackPro API - Gestión de Taller Mecánico");
    info!("================================================");

    let env_config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    database::migrations::run(&pool).await?;
    if env_config.seed_demo_data {
        database::migrations::seed_demo_data(&pool).await?;
    }

    let addr: SocketAddr = env_config.server_addr().parse()?;

    // En desarrollo el CORS es permisivo; en producción se restringe a los
    // orígenes configurados
    let cors = if env_config.is_development() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(env_config.cors_origins.clone())
    };

    let app_state = AppState::new(pool, env_config);

    let app = Router::new()
        .route("/", get(welcome))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .nest("/api/usuarios", routes::user_routes::create_user_router())
        .nest("/api/clientes", routes::client_routes::create_client_router())
        .nest("/api/vehiculos", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/repuestos", routes::part_routes::create_part_router())
        .nest("/api/ordenes", routes::order_routes::create_order_router())
        .nest("/api/facturas", routes::invoice_routes::create_invoice_router())
        .nest("/api/estadisticas", routes::stats_routes::create_stats_router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   POST /api/auth/login - Iniciar sesión");
    info!("   GET  /api/clientes - Listar clientes");
    info!("   GET  /api/vehiculos - Listar vehículos");
    info!("   GET  /api/repuestos - Listar repuestos");
    info!("   GET  /api/ordenes - Listar órdenes de servicio");
    info!("   GET  /api/facturas - Listar facturas");
    info!("   GET  /api/estadisticas - Resumen del taller");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Ruta de bienvenida
async fn welcome() -> Json<serde_json::Value> {
    Json(json!({
        "message": "🚗 AutoTrackPro API",
        "version": "1.0.0",
        "status": "online",
        "endpoints": {
            "clientes": "/api/clientes",
            "vehiculos": "/api/vehiculos",
            "ordenes": "/api/ordenes",
            "repuestos": "/api/repuestos",
            "facturas": "/api/facturas",
            "estadisticas": "/api/estadisticas"
        }
    }))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Ruta no encontrada",
            "message": "Verifica la URL e intenta de nuevo"
        })),
    )
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
