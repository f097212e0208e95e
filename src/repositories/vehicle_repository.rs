use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::VehicleStore;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppResult;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleStore for VehicleRepository {
    async fn create(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, registration_number, model, capacity, vehicle_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.registration_number)
        .bind(&vehicle.model)
        .bind(vehicle.capacity)
        .bind(vehicle.vehicle_status)
        .bind(vehicle.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    async fn registration_exists(&self, registration_number: &str) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE registration_number = $1)",
        )
        .bind(registration_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET registration_number = $2, model = $3, capacity = $4, vehicle_status = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.registration_number)
        .bind(&vehicle.model)
        .bind(vehicle.capacity)
        .bind(vehicle.vehicle_status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn set_status(&self, id: Uuid, status: VehicleStatus) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET vehicle_status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }
}
