use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::assignment_dto::AssignmentResponse;
use crate::dto::subscription_dto::{
    CreateSubscriptionRequest, RideProgressResponse, RideResponse, SubscriptionCreatedResponse,
    SubscriptionResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::assignment::AssignmentFilters;
use crate::models::subscription::{CancellationSummary, PlanType, Subscription};
use crate::repositories::{AssignmentStore, RouteStore, SubscriptionStore};
use crate::services::subscription_ledger::{build_subscription, total_refund, NewSubscription};
use crate::state::AppState;
use crate::utils::errors::{field_error, AppError, AppResult};
use crate::utils::schedule::parse_weekdays;
use crate::utils::validation::{validate_date, validate_non_negative, validate_time_of_day};

pub struct SubscriptionController {
    subscriptions: Arc<dyn SubscriptionStore>,
    routes: Arc<dyn RouteStore>,
    assignments: Arc<dyn AssignmentStore>,
    refund_ratio: Decimal,
}

impl SubscriptionController {
    pub fn new(state: &AppState) -> Self {
        Self {
            subscriptions: state.subscriptions.clone(),
            routes: state.routes.clone(),
            assignments: state.assignments.clone(),
            refund_ratio: state.config.refund_ratio,
        }
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateSubscriptionRequest,
    ) -> AppResult<SubscriptionCreatedResponse> {
        request.validate()?;
        validate_non_negative(request.price).map_err(|e| field_error("price", e))?;

        let schedule_days = parse_weekdays(&request.schedule_days)
            .map_err(|day| AppError::BadRequest(format!("Día de la semana inválido: '{}'", day)))?;
        let schedule_time =
            validate_time_of_day(&request.schedule_time).map_err(|e| field_error("scheduleTime", e))?;
        let plan_type = request
            .plan_type
            .parse::<PlanType>()
            .map_err(|plan| AppError::BadRequest(format!("Plan desconocido: '{}'", plan)))?;
        let start_date = validate_date(&request.start_date).map_err(|e| field_error("startDate", e))?;
        let end_date = request
            .end_date
            .as_deref()
            .map(|value| validate_date(value).map_err(|e| field_error("endDate", e)))
            .transpose()?;

        let route = self
            .routes
            .find_by_id(request.route_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ruta {} no encontrada", request.route_id)))?;

        let (subscription, rides) = build_subscription(
            &route,
            NewSubscription {
                user_id: user.user_id,
                pickup_stop: request.pickup_stop,
                drop_stop: request.drop_stop,
                schedule_days,
                schedule_time,
                plan_type,
                price: request.price,
                start_date,
                end_date,
            },
            Utc::now(),
        )?;

        let subscription = self.subscriptions.create_with_rides(&subscription, &rides).await?;
        info!(
            "🎫 Suscripción {} creada para {}: {} rides en '{}'",
            subscription.id,
            user.user_id,
            rides.len(),
            route.name
        );

        Ok(SubscriptionCreatedResponse {
            subscription: SubscriptionResponse::from(subscription),
            rides: rides.into_iter().map(RideResponse::from).collect(),
        })
    }

    pub async fn list(&self, user: &AuthenticatedUser) -> AppResult<Vec<SubscriptionResponse>> {
        let subscriptions = self.subscriptions.list_by_user(user.user_id).await?;
        Ok(subscriptions.into_iter().map(SubscriptionResponse::from).collect())
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<SubscriptionResponse> {
        let subscription = self.load_owned(user, id).await?;
        Ok(SubscriptionResponse::from(subscription))
    }

    pub async fn rides(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<Vec<RideResponse>> {
        let subscription = self.load_owned(user, id).await?;
        let rides = self.subscriptions.list_rides(subscription.id).await?;
        Ok(rides.into_iter().map(RideResponse::from).collect())
    }

    /// Desactivar y reembolsar los rides programados desde hoy
    pub async fn cancel(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<CancellationSummary> {
        let subscription = self.load_owned(user, id).await?;
        let today = Utc::now().date_naive();

        let cancelled = self
            .subscriptions
            .cancel(subscription.id, today, self.refund_ratio)
            .await?
            .ok_or_else(|| AppError::InvalidState(format!("La suscripción {} ya está cancelada", id)))?;

        let summary = CancellationSummary {
            subscription_id: subscription.id,
            cancelled_rides: cancelled.len(),
            total_refund: total_refund(&cancelled),
        };
        info!(
            "🎫 Suscripción {} cancelada: {} rides, reembolso {}",
            id, summary.cancelled_rides, summary.total_refund
        );
        Ok(summary)
    }

    /// Progreso del van que cubre la ruta del ride ese día
    pub async fn ride_progress(&self, user: &AuthenticatedUser, ride_id: Uuid) -> AppResult<RideProgressResponse> {
        let ride = self
            .subscriptions
            .find_ride(ride_id)
            .await?
            .filter(|ride| user.can_access(ride.user_id))
            .ok_or_else(|| AppError::NotFound(format!("Ride {} no encontrado", ride_id)))?;

        let filters = AssignmentFilters {
            route_id: Some(ride.route_id),
            date: Some(ride.ride_date),
            ..AssignmentFilters::default()
        };
        let assignment = self.assignments.list(&filters).await?.into_iter().next();

        let assignment = match assignment {
            Some(assignment) => {
                let route = self
                    .routes
                    .find_by_id(assignment.route_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Ruta {} no encontrada", assignment.route_id)))?;
                Some(AssignmentResponse::new(assignment, &route))
            }
            None => None,
        };

        Ok(RideProgressResponse {
            ride: RideResponse::from(ride),
            assignment,
        })
    }

    async fn load_owned(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<Subscription> {
        self.subscriptions
            .find_by_id(id)
            .await?
            .filter(|subscription| user.can_access(subscription.user_id))
            .ok_or_else(|| AppError::NotFound(format!("Suscripción {} no encontrada", id)))
    }
}
