use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::route_dto::{
    to_route_stops, CreateRouteRequest, RouteResponse, RouteStopInput, UpdateRouteRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::route_template::{RouteStop, RouteTemplate};
use crate::repositories::RouteStore;
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError, AppResult};

pub struct RouteController {
    routes: Arc<dyn RouteStore>,
}

impl RouteController {
    pub fn new(state: &AppState) -> Self {
        Self {
            routes: state.routes.clone(),
        }
    }

    /// Rutas activas; los admins pueden pedir también las inactivas
    pub async fn list(&self, user: &AuthenticatedUser, include_inactive: bool) -> AppResult<Vec<RouteResponse>> {
        let routes = self.routes.list(include_inactive && user.is_admin()).await?;
        Ok(routes.iter().map(RouteResponse::from).collect())
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<RouteResponse> {
        let route = self
            .routes
            .find_by_id(id)
            .await?
            .filter(|route| route.active || user.is_admin())
            .ok_or_else(|| not_found(id))?;
        Ok(RouteResponse::from(&route))
    }

    pub async fn create(&self, request: CreateRouteRequest) -> AppResult<RouteResponse> {
        request.validate()?;
        request.start_point.validate()?;
        request.end_point.validate()?;
        let stops = validated_stops(request.stops)?;

        let now = Utc::now();
        let route = RouteTemplate {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            start_point: request.start_point.into(),
            end_point: request.end_point.into(),
            stops,
            active: true,
            created_at: now,
            updated_at: now,
        };

        let route = self.routes.create(&route).await?;
        info!("🗺️ Ruta '{}' creada con {} paradas", route.name, route.total_stops());
        Ok(RouteResponse::from(&route))
    }

    pub async fn update(&self, id: Uuid, request: UpdateRouteRequest) -> AppResult<RouteResponse> {
        request.validate()?;
        let mut route = self.routes.find_by_id(id).await?.ok_or_else(|| not_found(id))?;

        if let Some(name) = request.name {
            route.name = name.trim().to_string();
        }
        if let Some(start_point) = request.start_point {
            start_point.validate()?;
            route.start_point = start_point.into();
        }
        if let Some(end_point) = request.end_point {
            end_point.validate()?;
            route.end_point = end_point.into();
        }
        if let Some(stops) = request.stops {
            route.stops = validated_stops(stops)?;
        }
        if let Some(active) = request.active {
            route.active = active;
        }

        let route = self.routes.update(&route).await?.ok_or_else(|| not_found(id))?;
        info!("🗺️ Ruta '{}' actualizada", route.name);
        Ok(RouteResponse::from(&route))
    }

    /// Las plantillas nunca se borran, solo se desactivan
    pub async fn deactivate(&self, id: Uuid) -> AppResult<RouteResponse> {
        let route = self.routes.set_active(id, false).await?.ok_or_else(|| not_found(id))?;
        info!("🗺️ Ruta '{}' desactivada", route.name);
        Ok(RouteResponse::from(&route))
    }
}

fn validated_stops(stops: Vec<RouteStopInput>) -> AppResult<Vec<RouteStop>> {
    for stop in &stops {
        stop.validate()?;
    }

    let stops = to_route_stops(stops);
    let mut orders = HashSet::new();
    if !stops.iter().all(|stop| orders.insert(stop.order)) {
        return Err(validation_error("stops", "Cada parada debe tener un order distinto"));
    }
    Ok(stops)
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Ruta {} no encontrada", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, order: Option<i32>) -> RouteStopInput {
        RouteStopInput {
            name: name.to_string(),
            lat: 12.97,
            lng: 77.64,
            order,
        }
    }

    #[test]
    fn test_duplicate_orders_rejected() {
        let result = validated_stops(vec![input("A", Some(1)), input("B", Some(1))]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_missing_order_uses_position() {
        let stops = validated_stops(vec![input("A", None), input("B", None)]).unwrap();
        assert_eq!(stops.iter().map(|s| s.order).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let mut stop = input("A", Some(0));
        stop.lat = 120.0;
        assert!(matches!(validated_stops(vec![stop]), Err(AppError::Validation(_))));
    }
}
