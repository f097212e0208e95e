//! Modelo de Vehicle
//!
//! Vans de la flota. Mapea a la tabla vehicles con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Maintenance,
    Retired,
}

impl VehicleStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(VehicleStatus::Active),
            "maintenance" => Some(VehicleStatus::Maintenance),
            "retired" => Some(VehicleStatus::Retired),
            _ => None,
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub registration_number: String,
    pub model: Option<String>,
    pub capacity: i32,
    pub vehicle_status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(registration_number: String, model: Option<String>, capacity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            registration_number,
            model,
            capacity,
            vehicle_status: VehicleStatus::Active,
            created_at: Utc::now(),
        }
    }
}
