//! Routers de la API
//!
//! Cada recurso expone su `create_*_router`; aquí se montan bajo `/api`
//! con autenticación, rate limiting, CORS, compresión y trazas.

pub mod assignment_routes;
pub mod auth_routes;
pub mod driver_routes;
pub mod route_routes;
pub mod subscription_routes;
pub mod vehicle_routes;

use axum::{extract::State, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::config::StorageBackend;
use crate::middleware::{auth::auth_middleware, cors::cors_layer, rate_limit::rate_limit_middleware};
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let public = Router::new().nest(
        "/api/auth",
        auth_routes::create_public_auth_router().layer(middleware::from_fn_with_state(
            state.rate_limit.clone(),
            rate_limit_middleware,
        )),
    );

    let protected = Router::new()
        .nest("/api/auth", auth_routes::create_session_router())
        .nest("/api/routes", route_routes::create_route_router())
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/drivers", driver_routes::create_driver_router())
        .nest("/api/assignments", assignment_routes::create_assignment_admin_router())
        .nest("/api/driver/assignments", assignment_routes::create_driver_assignment_router())
        .nest("/api/subscriptions", subscription_routes::create_subscription_router())
        .nest("/api/rides", subscription_routes::create_ride_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(public)
        .merge(protected)
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let storage = match state.config.storage_backend {
        StorageBackend::Postgres => "postgres",
        StorageBackend::Memory => "memory",
    };
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
