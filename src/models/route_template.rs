//! Modelo de RouteTemplate
//!
//! Plantillas de ruta definidas por el admin: punto de inicio, paradas
//! intermedias ordenadas por `order` y punto final.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::geo::Coordinate;

/// Punto geográfico con nombre (inicio / fin de ruta)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Parada intermedia en su forma canónica
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub order: i32,
}

/// Parada tal como está persistida. Las filas antiguas (columna `stoppages`)
/// pueden no traer `order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredStop {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub order: Option<i32>,
}

/// Plantilla de ruta con las paradas ya normalizadas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteTemplate {
    pub id: Uuid,
    pub name: String,
    pub start_point: GeoPoint,
    pub end_point: GeoPoint,
    pub stops: Vec<RouteStop>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RouteTemplate {
    /// Inicio + paradas + fin
    pub fn total_stops(&self) -> usize {
        self.stops.len() + 2
    }
}

/// Tipo de punto dentro de la secuencia completa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Start,
    Stop,
    End,
}

/// Entrada de la secuencia `[inicio, ...paradas, fin]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencedStop {
    pub index: i32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub kind: StopKind,
}

impl SequencedStop {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}
