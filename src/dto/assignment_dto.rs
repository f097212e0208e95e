use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::route_dto::RouteResponse;
use crate::models::assignment::{Assignment, AssignmentStatus, CompletedStop};
use crate::models::route_template::{RouteTemplate, SequencedStop};
use crate::services::progress_engine::{next_stop, total_stops};
use crate::utils::validation::format_time_of_day;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub driver_id: Uuid,
    pub route_id: Uuid,
    pub vehicle_id: Uuid,
    pub scheduled_date: String,
    pub scheduled_start_time: String,
}

// Un assignment por cada día de `days` en [startDate, endDate)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkAssignmentRequest {
    pub driver_id: Uuid,
    pub route_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: String,
    pub end_date: String,
    #[validate(length(min = 1, max = 7))]
    pub days: Vec<String>,
    pub scheduled_start_time: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DriverAssignmentsQuery {
    pub date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAssignmentsQuery {
    pub date: Option<String>,
    pub driver_id: Option<Uuid>,
    pub route_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceProgressRequest {
    pub stop_index: i32,
}

// Assignment con la ruta resuelta para que la UI no derive nada
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub route_id: Uuid,
    pub vehicle_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub scheduled_start_time: String,
    pub current_stop_index: i32,
    pub completed_stops: Vec<CompletedStop>,
    pub status: AssignmentStatus,
    pub total_stops: i32,
    pub next_stop: Option<SequencedStop>,
    pub version: i64,
    pub route: RouteResponse,
    pub updated_at: DateTime<Utc>,
}

impl AssignmentResponse {
    pub fn new(assignment: Assignment, route: &RouteTemplate) -> Self {
        Self {
            total_stops: total_stops(route),
            next_stop: next_stop(&assignment, route),
            route: RouteResponse::from(route),
            id: assignment.id,
            driver_id: assignment.driver_id,
            route_id: assignment.route_id,
            vehicle_id: assignment.vehicle_id,
            scheduled_date: assignment.scheduled_date,
            scheduled_start_time: format_time_of_day(&assignment.scheduled_start_time),
            current_stop_index: assignment.current_stop_index,
            completed_stops: assignment.completed_stops,
            status: assignment.status,
            version: assignment.version,
            updated_at: assignment.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStopResponse {
    pub assignment_id: Uuid,
    pub current_stop_index: i32,
    pub total_stops: i32,
    pub status: AssignmentStatus,
    pub finished: bool,
    pub next_stop: Option<SequencedStop>,
}

impl NextStopResponse {
    pub fn new(assignment: &Assignment, route: &RouteTemplate) -> Self {
        let next = next_stop(assignment, route);
        Self {
            assignment_id: assignment.id,
            current_stop_index: assignment.current_stop_index,
            total_stops: total_stops(route),
            status: assignment.status,
            finished: next.is_none(),
            next_stop: next,
        }
    }
}
