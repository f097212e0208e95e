use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::assignment_controller::AssignmentController;
use crate::dto::assignment_dto::{
    AdminAssignmentsQuery, AdvanceProgressRequest, AssignmentResponse, BulkAssignmentRequest,
    CreateAssignmentRequest, DriverAssignmentsQuery, NextStopResponse, UpdateStatusRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{admin_only_middleware, driver_only_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Administración de assignments (`/api/assignments`)
pub fn create_assignment_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_by_date).post(create_assignment))
        .route("/bulk", post(create_bulk))
        .route_layer(middleware::from_fn(admin_only_middleware))
}

/// Flujo del conductor (`/api/driver/assignments`)
pub fn create_driver_assignment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_for_driver))
        .route("/:id", get(get_assignment))
        .route("/:id/next-stop", get(next_stop))
        .route("/:id/status", put(update_status))
        .route("/:id/progress", put(advance_progress))
        .route("/:id/reset", post(reset_progress))
        .route_layer(middleware::from_fn(driver_only_middleware))
}

async fn list_by_date(
    State(state): State<AppState>,
    Query(query): Query<AdminAssignmentsQuery>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    Ok(Json(controller.list_by_date(query).await?))
}

async fn create_assignment(
    State(state): State<AppState>,
    Json(request): Json<CreateAssignmentRequest>,
) -> Result<Json<ApiResponse<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let assignment = controller.create(request).await?;
    Ok(Json(ApiResponse::success_with_message(assignment, "Assignment creado exitosamente")))
}

async fn create_bulk(
    State(state): State<AppState>,
    Json(request): Json<BulkAssignmentRequest>,
) -> Result<Json<ApiResponse<Vec<AssignmentResponse>>>, AppError> {
    let controller = AssignmentController::new(&state);
    let assignments = controller.create_bulk(request).await?;
    let message = format!("{} assignments creados", assignments.len());
    Ok(Json(ApiResponse::success_with_message(assignments, message)))
}

async fn list_for_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<DriverAssignmentsQuery>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    Ok(Json(controller.list_for_driver(&user, query).await?))
}

async fn get_assignment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssignmentResponse>, AppError> {
    let controller = AssignmentController::new(&state);
    Ok(Json(controller.get(&user, id).await?))
}

async fn next_stop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<NextStopResponse>, AppError> {
    let controller = AssignmentController::new(&state);
    Ok(Json(controller.next_stop(&user, id).await?))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let assignment = controller.set_status(&user, id, &request.status).await?;
    Ok(Json(ApiResponse::success_with_message(assignment, "Estado actualizado")))
}

async fn advance_progress(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AdvanceProgressRequest>,
) -> Result<Json<ApiResponse<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let assignment = controller.advance(&user, id, request.stop_index).await?;
    Ok(Json(ApiResponse::success_with_message(assignment, "Parada completada")))
}

async fn reset_progress(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let assignment = controller.reset(&user, id).await?;
    Ok(Json(ApiResponse::success_with_message(assignment, "Progreso reiniciado")))
}
