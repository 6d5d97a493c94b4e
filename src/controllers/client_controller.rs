//! Controller de clientes
//!
//! Al crear un cliente también se provisiona su cuenta de acceso con rol
//! cliente y una contraseña por defecto derivada de sus datos.

use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use validator::Validate;

use crate::dto::client_dto::{CreateClientRequest, UpdateClientRequest};
use crate::models::client::Client;
use crate::models::user::UserRole;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;

pub struct ClientController {
    repository: ClientRepository,
    users: UserRepository,
}

impl ClientController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClientRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<Client>, AppError> {
        self.repository.find_all_active().await
    }

    pub async fn get_by_id(&self, id_cliente: i32) -> Result<Client, AppError> {
        self.repository
            .find_by_id(id_cliente)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))
    }

    pub async fn create(&self, request: CreateClientRequest) -> Result<Client, AppError> {
        request.validate()?;

        // Contraseña por defecto: primeras 3 letras del nombre + primeros 4
        // dígitos del teléfono, en minúsculas
        let nombre_prefix: String = request.nombre.chars().take(3).collect();
        let telefono_prefix: String = request.telefono.chars().take(4).collect();
        let default_password = format!("{}{}", nombre_prefix, telefono_prefix).to_lowercase();
        let password_hash = hash(&default_password, DEFAULT_COST)?;

        let client = self
            .repository
            .create(
                &request.nombre,
                &request.telefono,
                &request.correo,
                request.direccion.as_deref(),
            )
            .await?;

        // Cuenta de acceso asociada; si el correo ya tenía cuenta, se
        // conserva la existente
        self.users
            .create_ignoring_duplicate(
                &request.nombre,
                &request.correo,
                &password_hash,
                UserRole::Cliente.as_str(),
            )
            .await?;

        Ok(client)
    }

    pub async fn update(
        &self,
        id_cliente: i32,
        request: UpdateClientRequest,
    ) -> Result<Client, AppError> {
        request.validate()?;

        self.repository
            .update(
                id_cliente,
                &request.nombre,
                &request.telefono,
                &request.correo,
                request.direccion.as_deref(),
            )
            .await
    }

    pub async fn deactivate(&self, id_cliente: i32) -> Result<(), AppError> {
        self.repository.deactivate(id_cliente).await
    }
}
