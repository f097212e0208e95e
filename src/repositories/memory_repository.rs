//! Backend en memoria
//!
//! Implementa todos los traits de persistencia sobre `RwLock<HashMap>`.
//! Cada operación de escritura se hace bajo un único write guard, lo que
//! da la misma atomicidad por registro que las sentencias UPDATE de Postgres.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AssignmentStore, RouteStore, SubscriptionStore, UserStore, VehicleStore};
use crate::models::assignment::{Assignment, AssignmentFilters};
use crate::models::route_template::RouteTemplate;
use crate::models::subscription::{Ride, RideStatus, Subscription};
use crate::models::user::{User, UserRole};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::services::subscription_ledger::refund_amount;
use crate::utils::errors::{AppError, AppResult};

#[derive(Default)]
pub struct InMemoryRepository {
    routes: RwLock<HashMap<Uuid, RouteTemplate>>,
    assignments: RwLock<HashMap<Uuid, Assignment>>,
    subscriptions: RwLock<HashMap<Uuid, Subscription>>,
    rides: RwLock<HashMap<Uuid, Ride>>,
    users: RwLock<HashMap<Uuid, User>>,
    vehicles: RwLock<HashMap<Uuid, Vehicle>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RouteStore for InMemoryRepository {
    async fn create(&self, route: &RouteTemplate) -> AppResult<RouteTemplate> {
        self.routes.write().await.insert(route.id, route.clone());
        Ok(route.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RouteTemplate>> {
        Ok(self.routes.read().await.get(&id).cloned())
    }

    async fn list(&self, include_inactive: bool) -> AppResult<Vec<RouteTemplate>> {
        let mut routes: Vec<RouteTemplate> = self
            .routes
            .read()
            .await
            .values()
            .filter(|route| include_inactive || route.active)
            .cloned()
            .collect();
        routes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(routes)
    }

    async fn update(&self, route: &RouteTemplate) -> AppResult<Option<RouteTemplate>> {
        let mut routes = self.routes.write().await;
        match routes.get_mut(&route.id) {
            Some(existing) => {
                *existing = RouteTemplate {
                    updated_at: Utc::now(),
                    ..route.clone()
                };
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<RouteTemplate>> {
        let mut routes = self.routes.write().await;
        Ok(routes.get_mut(&id).map(|route| {
            route.active = active;
            route.updated_at = Utc::now();
            route.clone()
        }))
    }
}

#[async_trait]
impl AssignmentStore for InMemoryRepository {
    async fn create(&self, assignment: &Assignment) -> AppResult<Assignment> {
        self.assignments.write().await.insert(assignment.id, assignment.clone());
        Ok(assignment.clone())
    }

    async fn create_many(&self, assignments: &[Assignment]) -> AppResult<Vec<Assignment>> {
        let mut store = self.assignments.write().await;
        for assignment in assignments {
            store.insert(assignment.id, assignment.clone());
        }
        Ok(assignments.to_vec())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>> {
        Ok(self.assignments.read().await.get(&id).cloned())
    }

    async fn list(&self, filters: &AssignmentFilters) -> AppResult<Vec<Assignment>> {
        let mut found: Vec<Assignment> = self
            .assignments
            .read()
            .await
            .values()
            .filter(|a| filters.driver_id.map_or(true, |id| a.driver_id == id))
            .filter(|a| filters.route_id.map_or(true, |id| a.route_id == id))
            .filter(|a| filters.date.map_or(true, |date| a.scheduled_date == date))
            .filter(|a| filters.status.map_or(true, |status| a.status == status))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.scheduled_start_time
                .cmp(&b.scheduled_start_time)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(found)
    }

    async fn save_progress(&self, next: &Assignment, expected_version: i64) -> AppResult<Option<Assignment>> {
        let mut store = self.assignments.write().await;
        let current = store
            .get_mut(&next.id)
            .ok_or_else(|| AppError::NotFound(format!("Assignment {} no encontrado", next.id)))?;

        if current.version != expected_version {
            return Ok(None);
        }

        current.current_stop_index = next.current_stop_index;
        current.completed_stops = next.completed_stops.clone();
        current.status = next.status;
        current.updated_at = next.updated_at;
        current.version += 1;
        Ok(Some(current.clone()))
    }
}

#[async_trait]
impl SubscriptionStore for InMemoryRepository {
    async fn create_with_rides(&self, subscription: &Subscription, rides: &[Ride]) -> AppResult<Subscription> {
        let mut subscriptions = self.subscriptions.write().await;
        let mut stored_rides = self.rides.write().await;
        subscriptions.insert(subscription.id, subscription.clone());
        for ride in rides {
            stored_rides.insert(ride.id, ride.clone());
        }
        Ok(subscription.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self.subscriptions.read().await.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        let mut found: Vec<Subscription> = self
            .subscriptions
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn list_rides(&self, subscription_id: Uuid) -> AppResult<Vec<Ride>> {
        let mut found: Vec<Ride> = self
            .rides
            .read()
            .await
            .values()
            .filter(|r| r.subscription_id == subscription_id)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.ride_date);
        Ok(found)
    }

    async fn find_ride(&self, ride_id: Uuid) -> AppResult<Option<Ride>> {
        Ok(self.rides.read().await.get(&ride_id).cloned())
    }

    async fn cancel(
        &self,
        subscription_id: Uuid,
        from_date: NaiveDate,
        refund_ratio: Decimal,
    ) -> AppResult<Option<Vec<Ride>>> {
        let mut subscriptions = self.subscriptions.write().await;
        let mut rides = self.rides.write().await;

        match subscriptions.get_mut(&subscription_id) {
            Some(subscription) if subscription.active => subscription.active = false,
            _ => return Ok(None),
        }

        let mut cancelled: Vec<Ride> = rides
            .values_mut()
            .filter(|r| {
                r.subscription_id == subscription_id
                    && r.status == RideStatus::Scheduled
                    && r.ride_date >= from_date
            })
            .map(|ride| {
                ride.status = RideStatus::Cancelled;
                ride.refund_amount = Some(refund_amount(ride.fare, refund_ratio));
                ride.clone()
            })
            .collect();
        cancelled.sort_by_key(|r| r.ride_date);
        Ok(Some(cancelled))
    }
}

#[async_trait]
impl UserStore for InMemoryRepository {
    async fn create(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("El email ya está registrado".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim().to_lowercase();
        Ok(self.users.read().await.values().find(|u| u.email == email).cloned())
    }

    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let mut found: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }
}

#[async_trait]
impl VehicleStore for InMemoryRepository {
    async fn create(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        self.vehicles.write().await.insert(vehicle.id, vehicle.clone());
        Ok(vehicle.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.vehicles.read().await.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let mut found: Vec<Vehicle> = self.vehicles.read().await.values().cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn registration_exists(&self, registration_number: &str) -> AppResult<bool> {
        Ok(self
            .vehicles
            .read()
            .await
            .values()
            .any(|v| v.registration_number == registration_number))
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<Option<Vehicle>> {
        let mut vehicles = self.vehicles.write().await;
        Ok(vehicles.get_mut(&vehicle.id).map(|existing| {
            *existing = vehicle.clone();
            existing.clone()
        }))
    }

    async fn set_status(&self, id: Uuid, status: VehicleStatus) -> AppResult<Option<Vehicle>> {
        let mut vehicles = self.vehicles.write().await;
        Ok(vehicles.get_mut(&id).map(|vehicle| {
            vehicle.vehicle_status = status;
            vehicle.clone()
        }))
    }
}
