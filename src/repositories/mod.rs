//! Repositorios
//!
//! Cada agregado expone un trait de persistencia con dos implementaciones:
//! PostgreSQL (producción) y memoria (desarrollo local y tests).

pub mod assignment_repository;
pub mod memory_repository;
pub mod route_repository;
pub mod subscription_repository;
pub mod user_repository;
pub mod vehicle_repository;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::assignment::{Assignment, AssignmentFilters};
use crate::models::route_template::RouteTemplate;
use crate::models::subscription::{Ride, Subscription};
use crate::models::user::{User, UserRole};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppResult;

pub use assignment_repository::AssignmentRepository;
pub use memory_repository::InMemoryRepository;
pub use route_repository::RouteRepository;
pub use subscription_repository::SubscriptionRepository;
pub use user_repository::UserRepository;
pub use vehicle_repository::VehicleRepository;

#[async_trait]
pub trait RouteStore: Send + Sync {
    async fn create(&self, route: &RouteTemplate) -> AppResult<RouteTemplate>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RouteTemplate>>;
    async fn list(&self, include_inactive: bool) -> AppResult<Vec<RouteTemplate>>;
    async fn update(&self, route: &RouteTemplate) -> AppResult<Option<RouteTemplate>>;
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<RouteTemplate>>;
}

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn create(&self, assignment: &Assignment) -> AppResult<Assignment>;
    async fn create_many(&self, assignments: &[Assignment]) -> AppResult<Vec<Assignment>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>>;
    /// Ordenados por hora de inicio ascendente
    async fn list(&self, filters: &AssignmentFilters) -> AppResult<Vec<Assignment>>;
    /// Escritura condicional sobre `expected_version`; `None` si otro escritor ganó
    async fn save_progress(&self, next: &Assignment, expected_version: i64) -> AppResult<Option<Assignment>>;
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Suscripción y rides en una sola transacción
    async fn create_with_rides(&self, subscription: &Subscription, rides: &[Ride]) -> AppResult<Subscription>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>>;
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>>;
    async fn list_rides(&self, subscription_id: Uuid) -> AppResult<Vec<Ride>>;
    async fn find_ride(&self, ride_id: Uuid) -> AppResult<Option<Ride>>;
    /// Desactiva la suscripción y cancela los rides programados desde `from_date`.
    /// `None` si la suscripción ya estaba inactiva.
    async fn cancel(
        &self,
        subscription_id: Uuid,
        from_date: NaiveDate,
        refund_ratio: Decimal,
    ) -> AppResult<Option<Vec<Ride>>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: &User) -> AppResult<User>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;
}

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn create(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;
    async fn list(&self) -> AppResult<Vec<Vehicle>>;
    async fn registration_exists(&self, registration_number: &str) -> AppResult<bool>;
    async fn update(&self, vehicle: &Vehicle) -> AppResult<Option<Vehicle>>;
    async fn set_status(&self, id: Uuid, status: VehicleStatus) -> AppResult<Option<Vehicle>>;
}
