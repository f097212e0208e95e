use std::sync::Arc;
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserRole;
use crate::repositories::UserStore;
use crate::services::auth_service::AuthService;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct AuthController {
    auth: AuthService,
    users: Arc<dyn UserStore>,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            auth: AuthService::from_state(state),
            users: state.users.clone(),
        }
    }

    /// Solo los pasajeros se registran solos
    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserResponse> {
        request.validate()?;
        let user = self
            .auth
            .register(request.name, request.email, &request.password, UserRole::Rider, request.phone, None)
            .await?;
        Ok(UserResponse::from(user))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;
        self.auth.login(&request.email, &request.password).await
    }

    pub async fn me(&self, user: &AuthenticatedUser) -> AppResult<UserResponse> {
        let user = self
            .users
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;
        Ok(UserResponse::from(user))
    }
}
