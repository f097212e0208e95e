use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::subscription_controller::SubscriptionController;
use crate::dto::subscription_dto::{
    CreateSubscriptionRequest, RideProgressResponse, RideResponse, SubscriptionCreatedResponse,
    SubscriptionResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{rider_only_middleware, AuthenticatedUser};
use crate::models::subscription::CancellationSummary;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// `/api/subscriptions`
pub fn create_subscription_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subscriptions).post(create_subscription))
        .route("/:id", get(get_subscription))
        .route("/:id/rides", get(list_rides))
        .route("/:id/cancel", post(cancel_subscription))
        .route_layer(middleware::from_fn(rider_only_middleware))
}

/// `/api/rides`
pub fn create_ride_router() -> Router<AppState> {
    Router::new()
        .route("/:id/progress", get(ride_progress))
        .route_layer(middleware::from_fn(rider_only_middleware))
}

async fn create_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<Json<ApiResponse<SubscriptionCreatedResponse>>, AppError> {
    let controller = SubscriptionController::new(&state);
    let created = controller.create(&user, request).await?;
    Ok(Json(ApiResponse::success_with_message(created, "Suscripción creada exitosamente")))
}

async fn list_subscriptions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<SubscriptionResponse>>, AppError> {
    let controller = SubscriptionController::new(&state);
    Ok(Json(controller.list(&user).await?))
}

async fn get_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let controller = SubscriptionController::new(&state);
    Ok(Json(controller.get(&user, id).await?))
}

async fn list_rides(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RideResponse>>, AppError> {
    let controller = SubscriptionController::new(&state);
    Ok(Json(controller.rides(&user, id).await?))
}

async fn cancel_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CancellationSummary>>, AppError> {
    let controller = SubscriptionController::new(&state);
    let summary = controller.cancel(&user, id).await?;
    Ok(Json(ApiResponse::success_with_message(summary, "Suscripción cancelada")))
}

async fn ride_progress(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<RideProgressResponse>, AppError> {
    let controller = SubscriptionController::new(&state);
    Ok(Json(controller.ride_progress(&user, id).await?))
}
