//! Controller de usuarios (administración de cuentas)

use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use validator::Validate;

use crate::dto::user_dto::{CreateUserRequest, ResetPasswordRequest, UpdateUserRequest};
use crate::models::user::{UserPublic, UserRole};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;

pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<UserPublic>, AppError> {
        self.repository.find_all().await
    }

    pub async fn get_by_id(&self, id_usuario: i32) -> Result<UserPublic, AppError> {
        self.repository
            .find_by_id(id_usuario)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<UserPublic, AppError> {
        request.validate()?;
        let rol = UserRole::parse(&request.rol)?;

        let password_hash = hash(&request.password, DEFAULT_COST)?;

        self.repository
            .create(&request.nombre, &request.email, &password_hash, rol.as_str())
            .await
    }

    pub async fn update(
        &self,
        id_usuario: i32,
        request: UpdateUserRequest,
    ) -> Result<UserPublic, AppError> {
        request.validate()?;

        let rol = match request.rol.as_deref() {
            Some(value) => Some(UserRole::parse(value)?),
            None => None,
        };

        self.repository
            .update(
                id_usuario,
                &request.nombre,
                &request.email,
                rol.map(|r| r.as_str()),
            )
            .await
    }

    pub async fn reset_password(
        &self,
        id_usuario: i32,
        request: ResetPasswordRequest,
    ) -> Result<(), AppError> {
        request.validate()?;
        let password_hash = hash(&request.password, DEFAULT_COST)?;
        self.repository.set_password(id_usuario, &password_hash).await
    }

    pub async fn deactivate(&self, id_usuario: i32) -> Result<(), AppError> {
        self.repository.set_active(id_usuario, false).await
    }

    pub async fn activate(&self, id_usuario: i32) -> Result<(), AppError> {
        self.repository.set_active(id_usuario, true).await
    }
}
