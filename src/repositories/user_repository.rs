//! Repositorio de usuarios

use sqlx::PgPool;

use crate::models::user::{User, UserPublic};
use crate::utils::errors::{is_unique_violation, AppError};

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<UserPublic>, AppError> {
        let users = sqlx::query_as::<_, UserPublic>(
            r#"
            SELECT id_usuario, nombre, email, rol, fecha_registro, activo
            FROM usuario ORDER BY id_usuario DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn find_by_id(&self, id_usuario: i32) -> Result<Option<UserPublic>, AppError> {
        let user = sqlx::query_as::<_, UserPublic>(
            r#"
            SELECT id_usuario, nombre, email, rol, fecha_registro, activo
            FROM usuario WHERE id_usuario = $1
            "#,
        )
        .bind(id_usuario)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Buscar una cuenta activa por email (para login)
    pub async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM usuario WHERE email = $1 AND activo = true")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    pub async fn find_password_hash(&self, id_usuario: i32) -> Result<Option<String>, AppError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT password FROM usuario WHERE id_usuario = $1")
                .bind(id_usuario)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(hash,)| hash))
    }

    pub async fn create(
        &self,
        nombre: &str,
        email: &str,
        password_hash: &str,
        rol: &str,
    ) -> Result<UserPublic, AppError> {
        let user = sqlx::query_as::<_, UserPublic>(
            r#"
            INSERT INTO usuario (nombre, email, password, rol)
            VALUES ($1, $2, $3, $4)
            RETURNING id_usuario, nombre, email, rol, fecha_registro, activo
            "#,
        )
        .bind(nombre)
        .bind(email)
        .bind(password_hash)
        .bind(rol)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("El email ya está registrado".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(user)
    }

    /// Crear la cuenta asociada a un cliente nuevo; un email duplicado
    /// se ignora (la cuenta ya existía).
    pub async fn create_ignoring_duplicate(
        &self,
        nombre: &str,
        email: &str,
        password_hash: &str,
        rol: &str,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO usuario (nombre, email, password, rol)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(nombre)
        .bind(email)
        .bind(password_hash)
        .bind(rol)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    pub async fn update(
        &self,
        id_usuario: i32,
        nombre: &str,
        email: &str,
        rol: Option<&str>,
    ) -> Result<UserPublic, AppError> {
        let user = sqlx::query_as::<_, UserPublic>(
            r#"
            UPDATE usuario
            SET nombre = $1, email = $2, rol = COALESCE($3, rol)
            WHERE id_usuario = $4
            RETURNING id_usuario, nombre, email, rol, fecha_registro, activo
            "#,
        )
        .bind(nombre)
        .bind(email)
        .bind(rol)
        .bind(id_usuario)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("El email ya está registrado".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        user.ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))
    }

    pub async fn set_password(&self, id_usuario: i32, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE usuario SET password = $1 WHERE id_usuario = $2")
            .bind(password_hash)
            .bind(id_usuario)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Usuario no encontrado".to_string()));
        }

        Ok(())
    }

    pub async fn set_active(&self, id_usuario: i32, activo: bool) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE usuario SET activo = $1 WHERE id_usuario = $2")
            .bind(activo)
            .bind(id_usuario)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Usuario no encontrado".to_string()));
        }

        Ok(())
    }
}
