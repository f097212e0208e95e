//! Utilidades geográficas
//!
//! Distancia haversine estática entre dos puntos; no hay cálculo de rutas.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn distance_km(&self, coord: &Self) -> f64 {
        let dist_lat = f64::to_radians(coord.latitude - self.latitude);
        let dist_lon = f64::to_radians(coord.longitude - self.longitude);
        let a = f64::powi(f64::sin(dist_lat / 2.0), 2)
            + f64::cos(f64::to_radians(self.latitude))
                * f64::cos(f64::to_radians(coord.latitude))
                * f64::powi(f64::sin(dist_lon / 2.0), 2);
        let c = 2.0 * f64::atan2(f64::sqrt(a), f64::sqrt(1.0 - a));
        EARTH_RADIUS_KM * c
    }
}

/// Redondear a 2 decimales para exponer en la API
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_paris_london() {
        let paris = Coordinate::new(48.8566, 2.3522);
        let london = Coordinate::new(51.5074, -0.1278);
        let d = paris.distance_km(&london);
        assert!((d - 343.5).abs() < 2.0, "got {}", d);
    }

    #[test]
    fn test_distance_same_point() {
        let p = Coordinate::new(12.9716, 77.5946);
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(3.14159), 3.14);
    }
}
