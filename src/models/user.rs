//! Modelo de Usuario
//!
//! Cuentas del personal y de los clientes del taller. El campo `rol`
//! determina qué endpoints puede usar cada cuenta.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::AppError;

/// Rol de un usuario del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Administrador,
    Mecanico,
    Cliente,
}

impl UserRole {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "administrador" => Ok(UserRole::Administrador),
            "mecanico" => Ok(UserRole::Mecanico),
            "cliente" => Ok(UserRole::Cliente),
            _ => Err(AppError::Validation(
                "Rol inválido. Debe ser: administrador, mecanico o cliente".to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Administrador => "administrador",
            UserRole::Mecanico => "mecanico",
            UserRole::Cliente => "cliente",
        }
    }
}

/// Usuario - mapea a la tabla usuario (incluye el hash de contraseña,
/// nunca se serializa hacia la API)
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id_usuario: i32,
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub rol: String,
    pub fecha_registro: DateTime<Utc>,
    pub activo: bool,
}

/// Usuario sin campos sensibles, apto para respuestas de la API
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserPublic {
    pub id_usuario: i32,
    pub nombre: String,
    pub email: String,
    pub rol: String,
    pub fecha_registro: DateTime<Utc>,
    pub activo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_roles() {
        assert_eq!(
            UserRole::parse("administrador").unwrap(),
            UserRole::Administrador
        );
        assert_eq!(UserRole::parse("mecanico").unwrap(), UserRole::Mecanico);
        assert_eq!(UserRole::parse("cliente").unwrap(), UserRole::Cliente);
    }

    #[test]
    fn parse_rejects_unknown_role() {
        assert!(UserRole::parse("gerente").is_err());
    }

    #[test]
    fn as_str_round_trips() {
        for rol in ["administrador", "mecanico", "cliente"] {
            assert_eq!(UserRole::parse(rol).unwrap().as_str(), rol);
        }
    }
}
