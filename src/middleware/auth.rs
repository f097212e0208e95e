//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de usuarios autenticados.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::{
    models::user::UserRole,
    state::AppState,
    utils::{
        errors::{AppError, AppResult},
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Los admins pueden ver recursos de cualquier usuario
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        self.is_admin() || self.user_id == owner_id
    }

    pub fn require_role(&self, allowed: &[UserRole]) -> AppResult<()> {
        if self.is_admin() || allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "El rol '{}' no tiene acceso a este recurso",
                self.role.as_str()
            )))
        }
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.jwt)?;
    let user_id = claims.user_id()?;

    // El rol vigente es el almacenado, no el del token
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    if !user.active {
        return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        role: user.role,
    });

    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de admin
pub async fn admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Se requieren permisos de administrador".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Conductores (y admins)
pub async fn driver_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    user.require_role(&[UserRole::Driver])?;
    Ok(next.run(request).await)
}

/// Pasajeros (y admins)
pub async fn rider_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    user.require_role(&[UserRole::Rider])?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_checks() {
        let driver = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role: UserRole::Driver,
        };
        assert!(driver.require_role(&[UserRole::Driver]).is_ok());
        assert!(matches!(driver.require_role(&[UserRole::Rider]), Err(AppError::Forbidden(_))));
        assert!(driver.can_access(driver.user_id));
        assert!(!driver.can_access(Uuid::new_v4()));

        let admin = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
        };
        assert!(admin.require_role(&[UserRole::Rider]).is_ok());
        assert!(admin.can_access(Uuid::new_v4()));
    }
}
