use axum::{extract::State, middleware, routing::get, Json, Router};

use crate::controllers::driver_controller::DriverController;
use crate::dto::auth_dto::UserResponse;
use crate::dto::driver_dto::CreateDriverRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::admin_only_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route_layer(middleware::from_fn(admin_only_middleware))
}

async fn list_drivers(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.list().await?))
}

async fn create_driver(
    State(state): State<AppState>,
    Json(request): Json<CreateDriverRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = DriverController::new(&state);
    let driver = controller.create(request).await?;
    Ok(Json(ApiResponse::success_with_message(driver, "Conductor creado exitosamente")))
}
