use std::sync::Arc;
use validator::Validate;

use crate::dto::auth_dto::UserResponse;
use crate::dto::driver_dto::CreateDriverRequest;
use crate::models::user::UserRole;
use crate::repositories::UserStore;
use crate::services::auth_service::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct DriverController {
    auth: AuthService,
    users: Arc<dyn UserStore>,
}

impl DriverController {
    pub fn new(state: &AppState) -> Self {
        Self {
            auth: AuthService::from_state(state),
            users: state.users.clone(),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<UserResponse>> {
        let drivers = self.users.list_by_role(UserRole::Driver).await?;
        Ok(drivers.into_iter().map(UserResponse::from).collect())
    }

    pub async fn create(&self, request: CreateDriverRequest) -> AppResult<UserResponse> {
        request.validate()?;
        let driver = self
            .auth
            .register(
                request.name,
                request.email,
                &request.password,
                UserRole::Driver,
                request.phone,
                Some(request.license_number.trim().to_string()),
            )
            .await?;
        Ok(UserResponse::from(driver))
    }
}
