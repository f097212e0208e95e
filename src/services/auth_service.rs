//! Servicio de autenticación
//!
//! Hash de contraseñas con bcrypt, verificación de credenciales y emisión
//! de tokens JWT para pasajeros, conductores y administradores.

use bcrypt::{hash, verify};
use std::sync::Arc;
use tracing::{info, warn};

use crate::dto::auth_dto::{LoginResponse, UserResponse};
use crate::models::user::{User, UserRole};
use crate::repositories::UserStore;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: JwtConfig,
    cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt: JwtConfig, cost: u32) -> Self {
        Self { users, jwt, cost }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.users.clone(), state.jwt.clone(), state.config.bcrypt_cost)
    }

    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        hash(password, self.cost).map_err(|e| AppError::Hash(e.to_string()))
    }

    /// Crear una cuenta nueva con la contraseña hasheada
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: &str,
        role: UserRole,
        phone: Option<String>,
        license_number: Option<String>,
    ) -> AppResult<User> {
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("El email ya está registrado".to_string()));
        }

        let password_hash = self.hash_password(password)?;
        let user = User::new(name.trim().to_string(), email, password_hash, role, phone, license_number);
        let user = self.users.create(&user).await?;

        info!("👤 Usuario {} registrado con rol {}", user.id, user.role.as_str());
        Ok(user)
    }

    /// Verificar credenciales y emitir token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let invalid = || AppError::Unauthorized("Credenciales inválidas".to_string());

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;

        if !verify(password, &user.password_hash).map_err(|e| AppError::Hash(e.to_string()))? {
            warn!("🔒 Contraseña incorrecta para {}", user.email);
            return Err(invalid());
        }

        if !user.active {
            return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
        }

        let token = generate_token(user.id, user.role, &self.jwt)?;
        info!("🔑 Login correcto para {} ({})", user.id, user.role.as_str());

        Ok(LoginResponse {
            token,
            token_type: "Bearer",
            expires_in: self.jwt.expiration,
            user: UserResponse::from(user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryRepository;
    use crate::utils::jwt::verify_token;

    fn service() -> AuthService {
        let jwt = JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        };
        AuthService::new(Arc::new(InMemoryRepository::new()), jwt, 4)
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let auth = service();
        let user = auth
            .register(
                "Asha".to_string(),
                "Asha@Example.com".to_string(),
                "password123",
                UserRole::Rider,
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(user.email, "asha@example.com");
        assert_ne!(user.password_hash, "password123");

        let login = auth.login("asha@example.com", "password123").await.unwrap();
        let claims = verify_token(&login.token, &auth.jwt).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.role().unwrap(), UserRole::Rider);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let auth = service();
        auth.register(
            "Ravi".to_string(),
            "ravi@example.com".to_string(),
            "password123",
            UserRole::Driver,
            None,
            Some("KA-2020-0001".to_string()),
        )
        .await
        .unwrap();

        assert!(matches!(
            auth.login("ravi@example.com", "nope").await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            auth.login("missing@example.com", "password123").await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let auth = service();
        for expected_ok in [true, false] {
            let result = auth
                .register(
                    "Meera".to_string(),
                    "meera@example.com".to_string(),
                    "password123",
                    UserRole::Rider,
                    None,
                    None,
                )
                .await;
            assert_eq!(result.is_ok(), expected_ok);
        }
    }
}
