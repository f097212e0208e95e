//! Modelo de Assignment
//!
//! Vinculación conductor + vehículo + ruta + día, con el estado de progreso
//! mutable que avanza el motor de progreso.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Estado del assignment - mapea al ENUM assignment_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "assignment_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Scheduled => "scheduled",
            AssignmentStatus::InProgress => "in-progress",
            AssignmentStatus::Completed => "completed",
            AssignmentStatus::Cancelled => "cancelled",
        }
    }

    /// Estados en los que ya no se puede avanzar de parada
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssignmentStatus::Completed | AssignmentStatus::Cancelled)
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "scheduled" => Ok(AssignmentStatus::Scheduled),
            "in-progress" => Ok(AssignmentStatus::InProgress),
            "completed" => Ok(AssignmentStatus::Completed),
            "cancelled" => Ok(AssignmentStatus::Cancelled),
            other => Err(other.to_string()),
        }
    }
}

/// Entrada del registro de paradas completadas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedStop {
    pub stop_index: i32,
    pub completed_at: DateTime<Utc>,
}

/// Assignment principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub route_id: Uuid,
    pub vehicle_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub scheduled_start_time: NaiveTime,
    pub current_stop_index: i32,
    pub completed_stops: Vec<CompletedStop>,
    pub status: AssignmentStatus,
    /// Contador de concurrencia optimista, se incrementa en cada escritura
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(
        driver_id: Uuid,
        route_id: Uuid,
        vehicle_id: Uuid,
        scheduled_date: NaiveDate,
        scheduled_start_time: NaiveTime,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            driver_id,
            route_id,
            vehicle_id,
            scheduled_date,
            scheduled_start_time,
            current_stop_index: 0,
            completed_stops: Vec::new(),
            status: AssignmentStatus::Scheduled,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Filtros para listar assignments de un día
#[derive(Debug, Clone, Default)]
pub struct AssignmentFilters {
    pub driver_id: Option<Uuid>,
    pub route_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub status: Option<AssignmentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&AssignmentStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        assert_eq!("in-progress".parse::<AssignmentStatus>(), Ok(AssignmentStatus::InProgress));
        assert!("paused".parse::<AssignmentStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(AssignmentStatus::Completed.is_terminal());
        assert!(AssignmentStatus::Cancelled.is_terminal());
        assert!(!AssignmentStatus::InProgress.is_terminal());
    }
}
