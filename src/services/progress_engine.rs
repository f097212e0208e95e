//! Motor de progreso de rutas
//!
//! Transiciones puras sobre un Assignment: avanzar de parada, forzar estado,
//! reiniciar y consultar la siguiente parada. Ninguna función toca la base
//! de datos; los repositorios persisten el estado resultante de forma atómica.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::assignment::{Assignment, AssignmentStatus, CompletedStop};
use crate::models::route_template::{RouteTemplate, SequencedStop};
use crate::services::route_stops::full_stop_sequence;

/// Errores del motor de progreso
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressError {
    #[error("la parada actual es {expected}, se recibió {received}")]
    OutOfOrder { expected: i32, received: i32 },

    #[error("el assignment fue modificado por otra petición")]
    Conflict,

    #[error("no se puede avanzar un assignment en estado '{0}'")]
    InvalidState(AssignmentStatus),

    #[error("la ruta tiene {total} paradas, no existe la parada {stop_index}")]
    PastLastStop { stop_index: i32, total: i32 },

    #[error("estado desconocido '{0}'")]
    UnknownStatus(String),
}

/// Inicio + paradas intermedias + fin
pub fn total_stops(route: &RouteTemplate) -> i32 {
    route.total_stops() as i32
}

/// Estado derivado tras completar una parada.
/// Única fuente de la regla de estado para el avance parada a parada.
pub fn derive_status(current: AssignmentStatus, current_stop_index: i32, total_stops: i32) -> AssignmentStatus {
    if current_stop_index >= total_stops {
        AssignmentStatus::Completed
    } else if current == AssignmentStatus::Scheduled {
        AssignmentStatus::InProgress
    } else {
        current
    }
}

/// AdvanceStop: completar la parada en la que está el assignment.
/// Devuelve el siguiente estado completo; el original no se modifica.
pub fn advance_stop(
    assignment: &Assignment,
    route: &RouteTemplate,
    stop_index: i32,
    now: DateTime<Utc>,
) -> Result<Assignment, ProgressError> {
    if assignment.status.is_terminal() {
        return Err(ProgressError::InvalidState(assignment.status));
    }

    // SetStatus o una edición de la ruta pueden dejar el índice al final
    let total = total_stops(route);
    if stop_index >= total {
        return Err(ProgressError::PastLastStop { stop_index, total });
    }

    if stop_index != assignment.current_stop_index {
        return Err(ProgressError::OutOfOrder {
            expected: assignment.current_stop_index,
            received: stop_index,
        });
    }

    let mut next = assignment.clone();
    next.completed_stops.push(CompletedStop {
        stop_index,
        completed_at: now,
    });
    next.current_stop_index = stop_index + 1;
    next.status = derive_status(assignment.status, next.current_stop_index, total);
    next.updated_at = now;
    Ok(next)
}

/// Parsear el estado recibido en SetStatus
pub fn parse_status(value: &str) -> Result<AssignmentStatus, ProgressError> {
    value.parse::<AssignmentStatus>().map_err(ProgressError::UnknownStatus)
}

/// Volver a `scheduled` por SetStatus significa reiniciar, no solo renombrar
pub fn status_restarts_progress(status: AssignmentStatus) -> bool {
    status == AssignmentStatus::Scheduled
}

/// SetStatus: override administrativo. No se valida contra el progreso, así
/// que puede dejar `status` y `current_stop_index` sin coherencia.
pub fn set_status(assignment: &Assignment, status: AssignmentStatus, now: DateTime<Utc>) -> Assignment {
    if status_restarts_progress(status) {
        return reset_progress(assignment, now);
    }
    let mut next = assignment.clone();
    next.status = status;
    next.updated_at = now;
    next
}

/// ResetProgress: siempre válido e idempotente
pub fn reset_progress(assignment: &Assignment, now: DateTime<Utc>) -> Assignment {
    let mut next = assignment.clone();
    next.current_stop_index = 0;
    next.completed_stops.clear();
    next.status = AssignmentStatus::Scheduled;
    next.updated_at = now;
    next
}

/// NextStop: parada en `current_stop_index`, o None si la ruta terminó
pub fn next_stop(assignment: &Assignment, route: &RouteTemplate) -> Option<SequencedStop> {
    if assignment.current_stop_index < 0 {
        return None;
    }
    full_stop_sequence(route)
        .into_iter()
        .nth(assignment.current_stop_index as usize)
}
