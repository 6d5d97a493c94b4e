//! Middleware de autenticación
//!
//! Resuelve el token Bearer en un `CurrentUser` con su rol antes de que la
//! request llegue a los controllers; los controllers nunca ven HTTP ni
//! roles. Los checks de rol se aplican en los handlers de ruta.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::models::user::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Usuario autenticado de la request actual
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub nombre: String,
    pub email: String,
    pub rol: UserRole,
    pub id_cliente: Option<i32>,
}

impl CurrentUser {
    /// Solo administradores
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.rol != UserRole::Administrador {
            return Err(AppError::Forbidden(
                "Acceso denegado. Se requieren permisos de administrador.".to_string(),
            ));
        }
        Ok(())
    }

    /// Administradores y mecánicos
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.rol != UserRole::Administrador && self.rol != UserRole::Mecanico {
            return Err(AppError::Forbidden(
                "Acceso denegado. Se requieren permisos de mecánico o administrador.".to_string(),
            ));
        }
        Ok(())
    }

    /// Filtro de visibilidad: un usuario cliente solo ve sus propios
    /// recursos; el personal ve todo
    pub fn client_scope(&self) -> Option<i32> {
        if self.rol == UserRole::Cliente {
            // Cuenta cliente sin cliente asociado: no ve nada
            Some(self.id_cliente.unwrap_or(-1))
        } else {
            None
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Token no proporcionado".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Token no proporcionado".to_string()))?;

        let claims = verify_token(token, &state.config)?;

        let id = claims
            .sub
            .parse::<i32>()
            .map_err(|_| AppError::Jwt("Token inválido".to_string()))?;
        let rol = UserRole::parse(&claims.rol)
            .map_err(|_| AppError::Jwt("Token inválido".to_string()))?;

        Ok(CurrentUser {
            id,
            nombre: claims.nombre,
            email: claims.email,
            rol,
            id_cliente: claims.id_cliente,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(rol: UserRole, id_cliente: Option<i32>) -> CurrentUser {
        CurrentUser {
            id: 1,
            nombre: "Test".to_string(),
            email: "test@taller.com".to_string(),
            rol,
            id_cliente,
        }
    }

    #[test]
    fn admin_passes_both_gates() {
        let admin = user(UserRole::Administrador, None);
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_staff().is_ok());
    }

    #[test]
    fn mechanic_is_staff_but_not_admin() {
        let mecanico = user(UserRole::Mecanico, None);
        assert!(mecanico.require_admin().is_err());
        assert!(mecanico.require_staff().is_ok());
    }

    #[test]
    fn client_fails_both_gates() {
        let cliente = user(UserRole::Cliente, Some(3));
        assert!(cliente.require_admin().is_err());
        assert!(cliente.require_staff().is_err());
    }

    #[test]
    fn client_scope_limits_visibility() {
        assert_eq!(user(UserRole::Administrador, None).client_scope(), None);
        assert_eq!(user(UserRole::Cliente, Some(3)).client_scope(), Some(3));
        assert_eq!(user(UserRole::Cliente, None).client_scope(), Some(-1));
    }
}
