use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{Vehicle, VehicleStatus};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    pub registration_number: String,
    #[validate(length(max = 255))]
    pub model: Option<String>,
    #[validate(range(min = 1, max = 60))]
    pub capacity: i32,
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    pub registration_number: Option<String>,
    #[validate(length(max = 255))]
    pub model: Option<String>,
    #[validate(range(min = 1, max = 60))]
    pub capacity: Option<i32>,
    pub status: Option<String>,
}

// Response de vehículo
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: Uuid,
    pub registration_number: String,
    pub model: Option<String>,
    pub capacity: i32,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            registration_number: vehicle.registration_number,
            model: vehicle.model,
            capacity: vehicle.capacity,
            status: vehicle.vehicle_status,
            created_at: vehicle.created_at,
        }
    }
}
