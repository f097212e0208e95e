use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::assignment_dto::AssignmentResponse;
use crate::models::subscription::{PlanType, Ride, RideStatus, Subscription};
use crate::utils::schedule::weekday_name;
use crate::utils::validation::format_time_of_day;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub route_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub pickup_stop: String,
    #[validate(length(min = 1, max = 255))]
    pub drop_stop: String,
    #[validate(length(min = 1, max = 7))]
    pub schedule_days: Vec<String>,
    pub schedule_time: String,
    pub plan_type: String,
    pub price: Decimal,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub route_id: Uuid,
    pub pickup_stop: String,
    pub drop_stop: String,
    pub schedule_days: Vec<&'static str>,
    pub schedule_time: String,
    pub plan_type: PlanType,
    pub price: Decimal,
    pub distance_km: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            user_id: subscription.user_id,
            route_id: subscription.route_id,
            pickup_stop: subscription.pickup_stop,
            drop_stop: subscription.drop_stop,
            schedule_days: subscription.schedule_days.iter().map(|day| weekday_name(*day)).collect(),
            schedule_time: format_time_of_day(&subscription.schedule_time),
            plan_type: subscription.plan_type,
            price: subscription.price,
            distance_km: subscription.distance_km,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            active: subscription.active,
            created_at: subscription.created_at,
        }
    }
}

// Suscripción recién creada con sus rides
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCreatedResponse {
    pub subscription: SubscriptionResponse,
    pub rides: Vec<RideResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideResponse {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub route_id: Uuid,
    pub ride_date: NaiveDate,
    pub pickup_time: String,
    pub pickup_stop: String,
    pub drop_stop: String,
    pub fare: Decimal,
    pub status: RideStatus,
    pub refund_amount: Option<Decimal>,
}

impl From<Ride> for RideResponse {
    fn from(ride: Ride) -> Self {
        Self {
            id: ride.id,
            subscription_id: ride.subscription_id,
            route_id: ride.route_id,
            ride_date: ride.ride_date,
            pickup_time: format_time_of_day(&ride.pickup_time),
            pickup_stop: ride.pickup_stop,
            drop_stop: ride.drop_stop,
            fare: ride.fare,
            status: ride.status,
            refund_amount: ride.refund_amount,
        }
    }
}

// Progreso en vivo del van que cubre un ride
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideProgressResponse {
    pub ride: RideResponse,
    pub assignment: Option<AssignmentResponse>,
}
