//! Shared application state
//!
//! Estado compartido de la aplicación que se pasa a través del router de
//! Axum. El pool y la configuración se inyectan explícitamente en cada
//! controller; no hay estado global.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self { pool, config }
    }
}
