//! Controller de autenticación

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{AuthUserInfo, ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::models::user::{UserPublic, UserRole};
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::generate_token;

pub struct AuthController {
    users: UserRepository,
    clients: ClientRepository,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            clients: ClientRepository::new(pool),
            config,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let user = self
            .users
            .find_active_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        if !verify(&request.password, &user.password)? {
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        // Las cuentas de cliente llevan asociado su id_cliente para filtrar
        // órdenes y facturas propias
        let id_cliente = if user.rol == UserRole::Cliente.as_str() {
            self.clients.find_id_by_email(&user.email).await?
        } else {
            None
        };

        let token = generate_token(&user, id_cliente, &self.config)?;

        tracing::info!("Login exitoso: {} ({})", user.email, user.rol);

        Ok(LoginResponse {
            message: "Login exitoso".to_string(),
            token,
            usuario: AuthUserInfo {
                id: user.id_usuario,
                id_cliente,
                nombre: user.nombre,
                email: user.email,
                rol: user.rol,
            },
        })
    }

    pub async fn profile(&self, id_usuario: i32) -> Result<UserPublic, AppError> {
        self.users
            .find_by_id(id_usuario)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))
    }

    pub async fn change_password(
        &self,
        id_usuario: i32,
        request: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        request.validate()?;

        let current_hash = self
            .users
            .find_password_hash(id_usuario)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        if !verify(&request.password_actual, &current_hash)? {
            return Err(AppError::Unauthorized(
                "Contraseña actual incorrecta".to_string(),
            ));
        }

        let new_hash = hash(&request.password_nueva, DEFAULT_COST)?;
        self.users.set_password(id_usuario, &new_hash).await
    }
}
