use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::VehicleStore;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, field_error, AppError, AppResult};
use crate::utils::validation::validate_registration_number;

pub struct VehicleController {
    repository: Arc<dyn VehicleStore>,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.vehicles.clone(),
        }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<VehicleResponse> {
        request.validate()?;
        let registration_number = normalize_registration(&request.registration_number)?;

        // Verificar que la matrícula no exista
        if self.repository.registration_exists(&registration_number).await? {
            return Err(conflict_error("Vehicle", "registrationNumber", &registration_number));
        }

        let vehicle = Vehicle::new(registration_number, request.model, request.capacity);
        let vehicle = self.repository.create(&vehicle).await?;

        info!("🚐 Vehículo {} registrado", vehicle.registration_number);
        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<VehicleResponse> {
        let vehicle = self.repository.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn list(&self) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.repository.list().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(&self, id: Uuid, request: UpdateVehicleRequest) -> AppResult<VehicleResponse> {
        request.validate()?;
        let mut vehicle = self.repository.find_by_id(id).await?.ok_or_else(|| not_found(id))?;

        if let Some(registration_number) = request.registration_number {
            let registration_number = normalize_registration(&registration_number)?;
            if registration_number != vehicle.registration_number
                && self.repository.registration_exists(&registration_number).await?
            {
                return Err(conflict_error("Vehicle", "registrationNumber", &registration_number));
            }
            vehicle.registration_number = registration_number;
        }
        if let Some(model) = request.model {
            vehicle.model = Some(model);
        }
        if let Some(capacity) = request.capacity {
            vehicle.capacity = capacity;
        }
        if let Some(status) = request.status {
            vehicle.vehicle_status = VehicleStatus::from_str(status.trim())
                .ok_or_else(|| AppError::BadRequest(format!("Estado de vehículo desconocido: '{}'", status)))?;
        }

        let vehicle = self.repository.update(&vehicle).await?.ok_or_else(|| not_found(id))?;
        Ok(VehicleResponse::from(vehicle))
    }

    /// Los vehículos no se borran, se retiran
    pub async fn retire(&self, id: Uuid) -> AppResult<VehicleResponse> {
        let vehicle = self
            .repository
            .set_status(id, VehicleStatus::Retired)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!("🚐 Vehículo {} retirado", vehicle.registration_number);
        Ok(VehicleResponse::from(vehicle))
    }
}

fn normalize_registration(value: &str) -> AppResult<String> {
    validate_registration_number(value).map_err(|e| field_error("registrationNumber", e))?;
    Ok(value.trim().to_uppercase())
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Vehículo {} no encontrado", id))
}
