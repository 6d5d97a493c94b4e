//! Conexión a PostgreSQL
//!
//! Este módulo maneja el pool de conexiones a la base de datos.

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear un pool de conexiones con una URL explícita
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Crear un pool leyendo DATABASE_URL del entorno
    pub async fn new_default() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment variables"))?;

        Self::new(&database_url).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
