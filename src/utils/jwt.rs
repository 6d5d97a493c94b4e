//! Utilidades JWT
//!
//! Este módulo contiene funciones helper para generar y verificar
//! los tokens de sesión de la API.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::environment::EnvironmentConfig;
use crate::models::user::User;
use crate::utils::errors::AppError;

/// Claims del JWT token
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // id_usuario
    pub nombre: String,
    pub email: String,
    pub rol: String,
    pub id_cliente: Option<i32>,
    pub exp: usize,
    pub iat: usize,
}

/// Generar JWT token para un usuario autenticado
pub fn generate_token(
    user: &User,
    id_cliente: Option<i32>,
    config: &EnvironmentConfig,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.jwt_expiration as i64);

    let claims = JwtClaims {
        sub: user.id_usuario.to_string(),
        nombre: user.nombre.clone(),
        email: user.email.clone(),
        rol: user.rol.clone(),
        id_cliente,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &EnvironmentConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Token inválido o expirado: {}", e)))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EnvironmentConfig {
        EnvironmentConfig {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            jwt_secret: "secreto_de_prueba".to_string(),
            jwt_expiration: 3600,
            cors_origins: vec![],
            strict_transitions: false,
            seed_demo_data: false,
        }
    }

    fn test_user() -> User {
        User {
            id_usuario: 7,
            nombre: "Carlos Méndez".to_string(),
            email: "cmendez@taller.com".to_string(),
            password: "$2b$10$hash".to_string(),
            rol: "mecanico".to_string(),
            fecha_registro: chrono::Utc::now(),
            activo: true,
        }
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let config = test_config();
        let token = generate_token(&test_user(), None, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.rol, "mecanico");
        assert_eq!(claims.id_cliente, None);
    }

    #[test]
    fn token_carries_client_id_for_client_users() {
        let config = test_config();
        let mut user = test_user();
        user.rol = "cliente".to_string();

        let token = generate_token(&user, Some(42), &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.id_cliente, Some(42));
    }

    #[test]
    fn tampered_secret_is_rejected() {
        let config = test_config();
        let token = generate_token(&test_user(), None, &config).unwrap();

        let mut other = test_config();
        other.jwt_secret = "otro_secreto".to_string();
        assert!(verify_token(&token, &other).is_err());
    }
}
