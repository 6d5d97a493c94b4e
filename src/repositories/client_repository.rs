//! Repositorio de clientes

use sqlx::PgPool;

use crate::models::client::Client;
use crate::utils::errors::{is_unique_violation, AppError};

pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all_active(&self) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM cliente WHERE activo = true ORDER BY id_cliente DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn find_by_id(&self, id_cliente: i32) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM cliente WHERE id_cliente = $1")
            .bind(id_cliente)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    pub async fn find_id_by_email(&self, correo: &str) -> Result<Option<i32>, AppError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT id_cliente FROM cliente WHERE correo = $1")
                .bind(correo)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(id,)| id))
    }

    pub async fn create(
        &self,
        nombre: &str,
        telefono: &str,
        correo: &str,
        direccion: Option<&str>,
    ) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO cliente (nombre, telefono, correo, direccion)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(nombre)
        .bind(telefono)
        .bind(correo)
        .bind(direccion)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("El correo ya está registrado".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(client)
    }

    pub async fn update(
        &self,
        id_cliente: i32,
        nombre: &str,
        telefono: &str,
        correo: &str,
        direccion: Option<&str>,
    ) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE cliente
            SET nombre = $1, telefono = $2, correo = $3, direccion = $4
            WHERE id_cliente = $5
            RETURNING *
            "#,
        )
        .bind(nombre)
        .bind(telefono)
        .bind(correo)
        .bind(direccion)
        .bind(id_cliente)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("El correo ya está registrado".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        client.ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))
    }

    pub async fn deactivate(&self, id_cliente: i32) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE cliente SET activo = false WHERE id_cliente = $1")
            .bind(id_cliente)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Cliente no encontrado".to_string()));
        }

        Ok(())
    }
}
