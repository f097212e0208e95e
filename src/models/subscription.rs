//! Modelos de Subscription y Ride
//!
//! Una suscripción es la reserva recurrente de un pasajero (parada de
//! subida/bajada en una ruta). Al crearla se materializa en un Ride por día.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::str::FromStr;
use uuid::Uuid;

/// Tipo de plan - mapea al ENUM plan_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "plan_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Daily,
    Weekly,
    Monthly,
}

impl PlanType {
    /// Duración por defecto del periodo del plan
    pub fn period(&self) -> Duration {
        match self {
            PlanType::Daily => Duration::days(1),
            PlanType::Weekly => Duration::days(7),
            PlanType::Monthly => Duration::days(30),
        }
    }
}

impl FromStr for PlanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(PlanType::Daily),
            "weekly" => Ok(PlanType::Weekly),
            "monthly" => Ok(PlanType::Monthly),
            other => Err(other.to_string()),
        }
    }
}

/// Suscripción recurrente de un pasajero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub route_id: Uuid,
    pub pickup_stop: String,
    pub drop_stop: String,
    pub schedule_days: Vec<Weekday>,
    pub schedule_time: NaiveTime,
    pub plan_type: PlanType,
    pub price: Decimal,
    pub distance_km: f64,
    pub start_date: NaiveDate,
    /// Exclusivo
    pub end_date: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Estado de un ride diario - mapea al ENUM ride_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "ride_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// Ride diario materializado desde una suscripción
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub user_id: Uuid,
    pub route_id: Uuid,
    pub ride_date: NaiveDate,
    pub pickup_time: NaiveTime,
    pub pickup_stop: String,
    pub drop_stop: String,
    pub fare: Decimal,
    pub status: RideStatus,
    pub refund_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Resultado de cancelar una suscripción
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationSummary {
    pub subscription_id: Uuid,
    pub cancelled_rides: usize,
    pub total_refund: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_period() {
        assert_eq!(PlanType::Daily.period(), Duration::days(1));
        assert_eq!(PlanType::Weekly.period(), Duration::days(7));
        assert_eq!(PlanType::Monthly.period(), Duration::days(30));
    }

    #[test]
    fn test_plan_parse() {
        assert_eq!("Weekly".parse::<PlanType>(), Ok(PlanType::Weekly));
        assert!("yearly".parse::<PlanType>().is_err());
    }
}
