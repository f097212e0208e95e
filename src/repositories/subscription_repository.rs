use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::SubscriptionStore;
use crate::models::subscription::{PlanType, Ride, RideStatus, Subscription};
use crate::services::subscription_ledger::refund_amount;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::schedule::{parse_weekdays, weekday_name};

/// Fila de la tabla subscriptions
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: Uuid,
    route_id: Uuid,
    pickup_stop: String,
    drop_stop: String,
    schedule_days: Vec<String>,
    schedule_time: NaiveTime,
    plan_type: PlanType,
    price: Decimal,
    distance_km: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = AppError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let schedule_days = parse_weekdays(&row.schedule_days)
            .map_err(|day| AppError::Internal(format!("Día inválido '{}' en suscripción {}", day, row.id)))?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            route_id: row.route_id,
            pickup_stop: row.pickup_stop,
            drop_stop: row.drop_stop,
            schedule_days,
            schedule_time: row.schedule_time,
            plan_type: row.plan_type,
            price: row.price,
            distance_km: row.distance_km,
            start_date: row.start_date,
            end_date: row.end_date,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

/// Fila de la tabla rides
#[derive(Debug, sqlx::FromRow)]
struct RideRow {
    id: Uuid,
    subscription_id: Uuid,
    user_id: Uuid,
    route_id: Uuid,
    ride_date: NaiveDate,
    pickup_time: NaiveTime,
    pickup_stop: String,
    drop_stop: String,
    fare: Decimal,
    status: RideStatus,
    refund_amount: Option<Decimal>,
    created_at: DateTime<Utc>,
}

impl From<RideRow> for Ride {
    fn from(row: RideRow) -> Self {
        Self {
            id: row.id,
            subscription_id: row.subscription_id,
            user_id: row.user_id,
            route_id: row.route_id,
            ride_date: row.ride_date,
            pickup_time: row.pickup_time,
            pickup_stop: row.pickup_stop,
            drop_stop: row.drop_stop,
            fare: row.fare,
            status: row.status,
            refund_amount: row.refund_amount,
            created_at: row.created_at,
        }
    }
}

pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for SubscriptionRepository {
    async fn create_with_rides(&self, subscription: &Subscription, rides: &[Ride]) -> AppResult<Subscription> {
        let mut tx = self.pool.begin().await?;

        let days: Vec<String> = subscription
            .schedule_days
            .iter()
            .map(|day| weekday_name(*day).to_string())
            .collect();

        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            INSERT INTO subscriptions (
                id, user_id, route_id, pickup_stop, drop_stop, schedule_days, schedule_time,
                plan_type, price, distance_km, start_date, end_date, active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(subscription.id)
        .bind(subscription.user_id)
        .bind(subscription.route_id)
        .bind(&subscription.pickup_stop)
        .bind(&subscription.drop_stop)
        .bind(days)
        .bind(subscription.schedule_time)
        .bind(subscription.plan_type)
        .bind(subscription.price)
        .bind(subscription.distance_km)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(subscription.active)
        .bind(subscription.created_at)
        .fetch_one(&mut *tx)
        .await?;

        for ride in rides {
            sqlx::query(
                r#"
                INSERT INTO rides (
                    id, subscription_id, user_id, route_id, ride_date, pickup_time,
                    pickup_stop, drop_stop, fare, status, refund_amount, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(ride.id)
            .bind(ride.subscription_id)
            .bind(ride.user_id)
            .bind(ride.route_id)
            .bind(ride.ride_date)
            .bind(ride.pickup_time)
            .bind(&ride.pickup_stop)
            .bind(&ride.drop_stop)
            .bind(ride.fare)
            .bind(ride.status)
            .bind(ride.refund_amount)
            .bind(ride.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>("SELECT * FROM subscriptions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Subscription::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(
            "SELECT * FROM subscriptions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    async fn list_rides(&self, subscription_id: Uuid) -> AppResult<Vec<Ride>> {
        let rows = sqlx::query_as::<_, RideRow>(
            "SELECT * FROM rides WHERE subscription_id = $1 ORDER BY ride_date ASC",
        )
        .bind(subscription_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Ride::from).collect())
    }

    async fn find_ride(&self, ride_id: Uuid) -> AppResult<Option<Ride>> {
        let row = sqlx::query_as::<_, RideRow>("SELECT * FROM rides WHERE id = $1")
            .bind(ride_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Ride::from))
    }

    async fn cancel(
        &self,
        subscription_id: Uuid,
        from_date: NaiveDate,
        refund_ratio: Decimal,
    ) -> AppResult<Option<Vec<Ride>>> {
        let mut tx = self.pool.begin().await?;

        let deactivated = sqlx::query("UPDATE subscriptions SET active = FALSE WHERE id = $1 AND active")
            .bind(subscription_id)
            .execute(&mut *tx)
            .await?;

        if deactivated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let pending = sqlx::query_as::<_, RideRow>(
            r#"
            SELECT * FROM rides
            WHERE subscription_id = $1 AND status = 'scheduled' AND ride_date >= $2
            ORDER BY ride_date ASC
            FOR UPDATE
            "#,
        )
        .bind(subscription_id)
        .bind(from_date)
        .fetch_all(&mut *tx)
        .await?;

        let mut cancelled = Vec::with_capacity(pending.len());
        for ride in pending {
            let refund = refund_amount(ride.fare, refund_ratio);
            let row = sqlx::query_as::<_, RideRow>(
                "UPDATE rides SET status = 'cancelled', refund_amount = $2 WHERE id = $1 RETURNING *",
            )
            .bind(ride.id)
            .bind(refund)
            .fetch_one(&mut *tx)
            .await?;
            cancelled.push(Ride::from(row));
        }

        tx.commit().await?;
        Ok(Some(cancelled))
    }
}
