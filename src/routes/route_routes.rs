use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::route_controller::RouteController;
use crate::dto::route_dto::{CreateRouteRequest, RouteListQuery, RouteResponse, UpdateRouteRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routes).post(create_route))
        .route("/:id", get(get_route).put(update_route).delete(deactivate_route))
}

fn require_admin(user: &AuthenticatedUser) -> AppResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Se requieren permisos de administrador".to_string()))
    }
}

async fn list_routes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<RouteListQuery>,
) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let controller = RouteController::new(&state);
    let routes = controller.list(&user, query.include_inactive.unwrap_or(false)).await?;
    Ok(Json(routes))
}

async fn get_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteResponse>, AppError> {
    let controller = RouteController::new(&state);
    Ok(Json(controller.get(&user, id).await?))
}

async fn create_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    require_admin(&user)?;
    let controller = RouteController::new(&state);
    let route = controller.create(request).await?;
    Ok(Json(ApiResponse::success_with_message(route, "Ruta creada exitosamente")))
}

async fn update_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    require_admin(&user)?;
    let controller = RouteController::new(&state);
    let route = controller.update(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(route, "Ruta actualizada exitosamente")))
}

async fn deactivate_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    require_admin(&user)?;
    let controller = RouteController::new(&state);
    let route = controller.deactivate(id).await?;
    Ok(Json(ApiResponse::success_with_message(route, "Ruta desactivada")))
}
