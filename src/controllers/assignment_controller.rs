//! Controlador de assignments
//!
//! Orquesta el motor de progreso con los repositorios: carga el assignment
//! del conductor, calcula el siguiente estado de forma pura y lo persiste
//! en una sola escritura.

use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::assignment_dto::{
    AdminAssignmentsQuery, AssignmentResponse, BulkAssignmentRequest, CreateAssignmentRequest,
    DriverAssignmentsQuery, NextStopResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::assignment::{Assignment, AssignmentFilters, AssignmentStatus};
use crate::models::route_template::RouteTemplate;
use crate::models::user::UserRole;
use crate::models::vehicle::VehicleStatus;
use crate::repositories::{AssignmentStore, RouteStore, UserStore, VehicleStore};
use crate::services::progress_engine::{self, ProgressError};
use crate::state::AppState;
use crate::utils::errors::{field_error, AppError, AppResult};
use crate::utils::schedule::{dates_matching, parse_weekdays};
use crate::utils::validation::{validate_date, validate_time_of_day};

/// Máximo de assignments por petición en bloque
const MAX_BULK_ASSIGNMENTS: usize = 366;

/// Intentos de SetStatus/ResetProgress ante escrituras concurrentes
const OVERRIDE_ATTEMPTS: usize = 3;

pub struct AssignmentController {
    assignments: Arc<dyn AssignmentStore>,
    routes: Arc<dyn RouteStore>,
    users: Arc<dyn UserStore>,
    vehicles: Arc<dyn VehicleStore>,
}

impl AssignmentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            assignments: state.assignments.clone(),
            routes: state.routes.clone(),
            users: state.users.clone(),
            vehicles: state.vehicles.clone(),
        }
    }

    /// Assignments del conductor para un día, por hora de inicio
    pub async fn list_for_driver(
        &self,
        user: &AuthenticatedUser,
        query: DriverAssignmentsQuery,
    ) -> AppResult<Vec<AssignmentResponse>> {
        let date = parse_optional_date(query.date.as_deref())?.unwrap_or_else(|| Utc::now().date_naive());
        let status = parse_status_filter(query.status.as_deref())?;

        let filters = AssignmentFilters {
            driver_id: Some(user.user_id),
            date: Some(date),
            status,
            ..AssignmentFilters::default()
        };

        let assignments = self.assignments.list(&filters).await?;
        self.with_routes(assignments).await
    }

    /// Vista de admin: todos los assignments de un día
    pub async fn list_by_date(&self, query: AdminAssignmentsQuery) -> AppResult<Vec<AssignmentResponse>> {
        let date = parse_optional_date(query.date.as_deref())?.unwrap_or_else(|| Utc::now().date_naive());

        let filters = AssignmentFilters {
            driver_id: query.driver_id,
            route_id: query.route_id,
            date: Some(date),
            status: parse_status_filter(query.status.as_deref())?,
        };

        let assignments = self.assignments.list(&filters).await?;
        self.with_routes(assignments).await
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<AssignmentResponse> {
        let assignment = self.load_owned(user, id).await?;
        let route = self.load_route(assignment.route_id).await?;
        Ok(AssignmentResponse::new(assignment, &route))
    }

    pub async fn next_stop(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<NextStopResponse> {
        let assignment = self.load_owned(user, id).await?;
        let route = self.load_route(assignment.route_id).await?;
        Ok(NextStopResponse::new(&assignment, &route))
    }

    /// Marcar la parada `stop_index` como completada
    pub async fn advance(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        stop_index: i32,
    ) -> AppResult<AssignmentResponse> {
        let current = self.load_owned(user, id).await?;
        let route = self.load_route(current.route_id).await?;

        let next = progress_engine::advance_stop(&current, &route, stop_index, Utc::now()).map_err(|e| {
            warn!("🔁 Avance rechazado en assignment {}: {}", id, e);
            e
        })?;

        let saved = self
            .assignments
            .save_progress(&next, current.version)
            .await?
            .ok_or_else(|| {
                warn!("🔁 Avance concurrente perdido en assignment {} (parada {})", id, stop_index);
                AppError::from(ProgressError::Conflict)
            })?;

        info!(
            "✅ Assignment {}: parada {} completada ({}/{}), estado {}",
            id,
            stop_index,
            saved.current_stop_index,
            progress_engine::total_stops(&route),
            saved.status
        );
        Ok(AssignmentResponse::new(saved, &route))
    }

    pub async fn set_status(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        status: &str,
    ) -> AppResult<AssignmentResponse> {
        let status = progress_engine::parse_status(status)?;
        let (previous, saved) = self
            .apply_override(user, id, |current| progress_engine::set_status(current, status, Utc::now()))
            .await?;

        info!("🔄 Assignment {}: estado {} -> {}", id, previous.status, saved.status);
        let route = self.load_route(saved.route_id).await?;
        Ok(AssignmentResponse::new(saved, &route))
    }

    pub async fn reset(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<AssignmentResponse> {
        let (_, saved) = self
            .apply_override(user, id, |current| progress_engine::reset_progress(current, Utc::now()))
            .await?;

        info!("⏮️ Assignment {}: progreso reiniciado", id);
        let route = self.load_route(saved.route_id).await?;
        Ok(AssignmentResponse::new(saved, &route))
    }

    pub async fn create(&self, request: CreateAssignmentRequest) -> AppResult<AssignmentResponse> {
        let date = validate_date(&request.scheduled_date).map_err(|e| field_error("scheduledDate", e))?;
        let time = validate_time_of_day(&request.scheduled_start_time)
            .map_err(|e| field_error("scheduledStartTime", e))?;

        let route = self
            .check_references(request.driver_id, request.route_id, request.vehicle_id)
            .await?;

        let assignment = Assignment::new(request.driver_id, request.route_id, request.vehicle_id, date, time);
        let assignment = self.assignments.create(&assignment).await?;

        info!(
            "🗓️ Assignment {} creado: conductor {} en ruta '{}' el {}",
            assignment.id, assignment.driver_id, route.name, assignment.scheduled_date
        );
        Ok(AssignmentResponse::new(assignment, &route))
    }

    pub async fn create_bulk(&self, request: BulkAssignmentRequest) -> AppResult<Vec<AssignmentResponse>> {
        request.validate()?;

        let start = validate_date(&request.start_date).map_err(|e| field_error("startDate", e))?;
        let end = validate_date(&request.end_date).map_err(|e| field_error("endDate", e))?;
        let time = validate_time_of_day(&request.scheduled_start_time)
            .map_err(|e| field_error("scheduledStartTime", e))?;
        let days = parse_weekdays(&request.days)
            .map_err(|day| AppError::BadRequest(format!("Día de la semana inválido: '{}'", day)))?;

        if end <= start {
            return Err(AppError::BadRequest(
                "La fecha de fin debe ser posterior a la de inicio".to_string(),
            ));
        }

        let dates = dates_matching(start, end, &days);
        if dates.is_empty() {
            return Err(AppError::BadRequest(
                "Ningún día del rango coincide con los días indicados".to_string(),
            ));
        }
        if dates.len() > MAX_BULK_ASSIGNMENTS {
            return Err(AppError::BadRequest(format!(
                "Máximo {} assignments por petición",
                MAX_BULK_ASSIGNMENTS
            )));
        }

        let route = self
            .check_references(request.driver_id, request.route_id, request.vehicle_id)
            .await?;

        let assignments: Vec<Assignment> = dates
            .into_iter()
            .map(|date| Assignment::new(request.driver_id, request.route_id, request.vehicle_id, date, time))
            .collect();

        let created = self.assignments.create_many(&assignments).await?;
        info!(
            "🗓️ {} assignments creados para el conductor {} en ruta '{}'",
            created.len(),
            request.driver_id,
            route.name
        );

        Ok(created
            .into_iter()
            .map(|assignment| AssignmentResponse::new(assignment, &route))
            .collect())
    }

    /// Los conductores solo ven sus propios assignments; el resto es NotFound
    async fn load_owned(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<Assignment> {
        let assignment = self.assignments.find_by_id(id).await?.ok_or_else(|| not_found(id))?;

        if !user.can_access(assignment.driver_id) {
            warn!("🔒 Conductor {} intentó acceder al assignment {}", user.user_id, id);
            return Err(not_found(id));
        }

        Ok(assignment)
    }

    /// SetStatus y ResetProgress no fallan por carrera: si otra escritura
    /// gana se recalcula sobre la versión nueva
    async fn apply_override<F>(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        transition: F,
    ) -> AppResult<(Assignment, Assignment)>
    where
        F: Fn(&Assignment) -> Assignment + Send + Sync,
    {
        for _ in 0..OVERRIDE_ATTEMPTS {
            let current = self.load_owned(user, id).await?;
            let next = transition(&current);
            if let Some(saved) = self.assignments.save_progress(&next, current.version).await? {
                return Ok((current, saved));
            }
            warn!("🔁 Override de assignment {} perdió la carrera, reintentando", id);
        }
        Err(ProgressError::Conflict.into())
    }

    async fn load_route(&self, route_id: Uuid) -> AppResult<RouteTemplate> {
        self.routes
            .find_by_id(route_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ruta {} no encontrada", route_id)))
    }

    /// Resolver cada ruta una sola vez para un listado
    async fn with_routes(&self, assignments: Vec<Assignment>) -> AppResult<Vec<AssignmentResponse>> {
        let mut routes: HashMap<Uuid, RouteTemplate> = HashMap::new();
        let mut responses = Vec::with_capacity(assignments.len());

        for assignment in assignments {
            if !routes.contains_key(&assignment.route_id) {
                let route = self.load_route(assignment.route_id).await?;
                routes.insert(route.id, route);
            }
            let route = &routes[&assignment.route_id];
            responses.push(AssignmentResponse::new(assignment, route));
        }

        Ok(responses)
    }

    async fn check_references(&self, driver_id: Uuid, route_id: Uuid, vehicle_id: Uuid) -> AppResult<RouteTemplate> {
        let route = self.load_route(route_id).await?;
        if !route.active {
            return Err(AppError::InvalidState(format!("La ruta '{}' no está activa", route.name)));
        }

        let driver = self
            .users
            .find_by_id(driver_id)
            .await?
            .filter(|user| user.role == UserRole::Driver)
            .ok_or_else(|| AppError::NotFound(format!("Conductor {} no encontrado", driver_id)))?;
        if !driver.active {
            return Err(AppError::InvalidState(format!("El conductor {} no está activo", driver.id)));
        }

        let vehicle = self
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehículo {} no encontrado", vehicle_id)))?;
        if vehicle.vehicle_status == VehicleStatus::Retired {
            return Err(AppError::InvalidState(format!(
                "El vehículo {} está retirado",
                vehicle.registration_number
            )));
        }

        Ok(route)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Assignment {} no encontrado", id))
}

fn parse_optional_date(value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| validate_date(v).map_err(|e| field_error("date", e)))
        .transpose()
}

fn parse_status_filter(value: Option<&str>) -> AppResult<Option<AssignmentStatus>> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.trim()
                .parse::<AssignmentStatus>()
                .map_err(|other| AppError::BadRequest(format!("Estado desconocido: '{}'", other)))
        })
        .transpose()
}
