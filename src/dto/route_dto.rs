use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::route_template::{GeoPoint, RouteStop, RouteTemplate, SequencedStop};
use crate::services::route_stops::{full_stop_sequence, sorted_stops};

// Punto de inicio o fin
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GeoPointInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

impl From<GeoPointInput> for GeoPoint {
    fn from(input: GeoPointInput) -> Self {
        Self {
            name: input.name.trim().to_string(),
            lat: input.lat,
            lng: input.lng,
        }
    }
}

// Parada intermedia; sin `order` toma su posición
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RouteStopInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    pub order: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub start_point: GeoPointInput,
    pub end_point: GeoPointInput,
    #[serde(default)]
    pub stops: Vec<RouteStopInput>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRouteRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub start_point: Option<GeoPointInput>,
    pub end_point: Option<GeoPointInput>,
    pub stops: Option<Vec<RouteStopInput>>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RouteListQuery {
    pub include_inactive: Option<bool>,
}

/// Convertir las paradas de entrada a su forma canónica
pub fn to_route_stops(stops: Vec<RouteStopInput>) -> Vec<RouteStop> {
    stops
        .into_iter()
        .enumerate()
        .map(|(position, stop)| RouteStop {
            name: stop.name.trim().to_string(),
            lat: stop.lat,
            lng: stop.lng,
            order: stop.order.unwrap_or(position as i32),
        })
        .collect()
}

// Ruta con paradas normalizadas y la secuencia completa
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub id: Uuid,
    pub name: String,
    pub start_point: GeoPoint,
    pub end_point: GeoPoint,
    pub stops: Vec<RouteStop>,
    pub sequence: Vec<SequencedStop>,
    pub total_stops: usize,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&RouteTemplate> for RouteResponse {
    fn from(route: &RouteTemplate) -> Self {
        Self {
            id: route.id,
            name: route.name.clone(),
            start_point: route.start_point.clone(),
            end_point: route.end_point.clone(),
            stops: sorted_stops(route),
            sequence: full_stop_sequence(route),
            total_stops: route.total_stops(),
            active: route.active,
            created_at: route.created_at,
            updated_at: route.updated_at,
        }
    }
}
