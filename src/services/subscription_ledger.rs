//! Ledger de suscripciones
//!
//! Construye una suscripción y sus rides diarios a partir de la petición del
//! pasajero. Funciones puras: la persistencia la hace el repositorio en una
//! sola transacción.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::route_template::{RouteTemplate, SequencedStop};
use crate::models::subscription::{PlanType, Ride, RideStatus, Subscription};
use crate::services::route_stops::position_of;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::geo::round_km;
use crate::utils::schedule::dates_matching;

/// Datos ya validados de una nueva suscripción
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub pickup_stop: String,
    pub drop_stop: String,
    pub schedule_days: Vec<Weekday>,
    pub schedule_time: NaiveTime,
    pub plan_type: PlanType,
    pub price: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Reembolso de un ride cancelado, redondeado a céntimos
pub fn refund_amount(fare: Decimal, ratio: Decimal) -> Decimal {
    (fare * ratio).round_dp(2)
}

/// Precio por ride. Sin rides el precio completo queda en la suscripción.
pub fn split_fare(price: Decimal, rides: usize) -> Decimal {
    if rides == 0 {
        return price.round_dp(2);
    }
    (price / Decimal::from(rides as u64)).round_dp(2)
}

/// Duración máxima de una suscripción, en días
pub const MAX_SUBSCRIPTION_DAYS: i64 = 366;

/// Fin exclusivo del periodo: el explícito o el del plan
pub fn plan_end_date(plan: PlanType, start: NaiveDate, end: Option<NaiveDate>) -> AppResult<NaiveDate> {
    match end {
        Some(end) => Ok(end),
        None => start
            .checked_add_signed(plan.period())
            .ok_or_else(|| AppError::BadRequest(format!("La fecha de inicio {} está fuera de rango", start))),
    }
}

/// Paradas de subida y bajada dentro de la ruta; la subida debe ir antes
pub fn resolve_stop_pair(
    route: &RouteTemplate,
    pickup: &str,
    drop: &str,
) -> AppResult<(SequencedStop, SequencedStop)> {
    let pickup_stop = position_of(route, pickup)
        .ok_or_else(|| AppError::BadRequest(format!("La parada '{}' no pertenece a la ruta", pickup)))?;
    let drop_stop = position_of(route, drop)
        .ok_or_else(|| AppError::BadRequest(format!("La parada '{}' no pertenece a la ruta", drop)))?;

    if pickup_stop.index >= drop_stop.index {
        return Err(AppError::BadRequest(
            "La parada de subida debe ir antes que la de bajada".to_string(),
        ));
    }

    Ok((pickup_stop, drop_stop))
}

/// Suscripción y rides materializados, listos para persistir
pub fn build_subscription(
    route: &RouteTemplate,
    request: NewSubscription,
    now: DateTime<Utc>,
) -> AppResult<(Subscription, Vec<Ride>)> {
    if !route.active {
        return Err(AppError::InvalidState(format!("La ruta {} no está activa", route.id)));
    }
    if request.schedule_days.is_empty() {
        return Err(AppError::BadRequest("Se requiere al menos un día".to_string()));
    }
    if request.price < Decimal::ZERO {
        return Err(AppError::BadRequest("El precio no puede ser negativo".to_string()));
    }

    let (pickup, drop) = resolve_stop_pair(route, &request.pickup_stop, &request.drop_stop)?;
    let end_date = plan_end_date(request.plan_type, request.start_date, request.end_date)?;
    if end_date <= request.start_date {
        return Err(AppError::BadRequest(
            "La fecha de fin debe ser posterior a la de inicio".to_string(),
        ));
    }
    if (end_date - request.start_date).num_days() > MAX_SUBSCRIPTION_DAYS {
        return Err(AppError::BadRequest(format!(
            "Una suscripción no puede durar más de {} días",
            MAX_SUBSCRIPTION_DAYS
        )));
    }

    let dates = dates_matching(request.start_date, end_date, &request.schedule_days);
    if dates.is_empty() {
        return Err(AppError::BadRequest(
            "Ningún día del periodo coincide con los días programados".to_string(),
        ));
    }

    let distance_km = round_km(pickup.coordinate().distance_km(&drop.coordinate()));

    let subscription = Subscription {
        id: Uuid::new_v4(),
        user_id: request.user_id,
        route_id: route.id,
        pickup_stop: pickup.name.clone(),
        drop_stop: drop.name.clone(),
        schedule_days: request.schedule_days,
        schedule_time: request.schedule_time,
        plan_type: request.plan_type,
        price: request.price,
        distance_km,
        start_date: request.start_date,
        end_date,
        active: true,
        created_at: now,
    };

    let fare = split_fare(subscription.price, dates.len());
    let rides = dates
        .into_iter()
        .map(|ride_date| Ride {
            id: Uuid::new_v4(),
            subscription_id: subscription.id,
            user_id: subscription.user_id,
            route_id: subscription.route_id,
            ride_date,
            pickup_time: subscription.schedule_time,
            pickup_stop: subscription.pickup_stop.clone(),
            drop_stop: subscription.drop_stop.clone(),
            fare,
            status: RideStatus::Scheduled,
            refund_amount: None,
            created_at: now,
        })
        .collect();

    Ok((subscription, rides))
}

/// Suma de reembolsos de los rides cancelados
pub fn total_refund(rides: &[Ride]) -> Decimal {
    rides.iter().filter_map(|ride| ride.refund_amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::route_template::RouteStop;
    use crate::services::route_stops::tests::sample_route;
    use std::str::FromStr;

    fn route() -> RouteTemplate {
        sample_route(vec![
            RouteStop {
                name: "Indiranagar".to_string(),
                lat: 12.9784,
                lng: 77.6408,
                order: 1,
            },
            RouteStop {
                name: "Marathahalli".to_string(),
                lat: 12.9569,
                lng: 77.7011,
                order: 2,
            },
        ])
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn request() -> NewSubscription {
        NewSubscription {
            user_id: Uuid::new_v4(),
            pickup_stop: "indiranagar".to_string(),
            drop_stop: "Whitefield".to_string(),
            schedule_days: vec![Weekday::Mon, Weekday::Wed, Weekday::Fri],
            schedule_time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            plan_type: PlanType::Weekly,
            price: Decimal::from_str("300").unwrap(),
            // lunes
            start_date: date("2024-03-04"),
            end_date: None,
        }
    }

    #[test]
    fn test_refund_rounding() {
        let fare = Decimal::from_str("33.33").unwrap();
        let ratio = Decimal::from_str("0.5").unwrap();
        assert_eq!(refund_amount(fare, ratio), Decimal::from_str("16.67").unwrap());
    }

    #[test]
    fn test_split_fare() {
        let price = Decimal::from_str("100").unwrap();
        assert_eq!(split_fare(price, 3), Decimal::from_str("33.33").unwrap());
        assert_eq!(split_fare(price, 0), price);
    }

    #[test]
    fn test_plan_end_date_defaults() {
        let start = date("2024-03-04");
        assert_eq!(plan_end_date(PlanType::Daily, start, None).unwrap(), date("2024-03-05"));
        assert_eq!(plan_end_date(PlanType::Monthly, start, None).unwrap(), date("2024-04-03"));
        assert_eq!(
            plan_end_date(PlanType::Weekly, start, Some(date("2024-03-06"))).unwrap(),
            date("2024-03-06")
        );
    }

    #[test]
    fn test_plan_end_date_at_calendar_limit() {
        assert!(matches!(
            plan_end_date(PlanType::Daily, NaiveDate::MAX, None),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_build_rejects_period_longer_than_a_year() {
        let route = route();
        let mut req = request();
        req.end_date = Some(date("2124-03-04"));
        assert!(matches!(
            build_subscription(&route, req, Utc::now()),
            Err(AppError::BadRequest(_))
        ));

        let mut req = request();
        req.end_date = Some(req.start_date + chrono::Duration::days(MAX_SUBSCRIPTION_DAYS));
        let (_, rides) = build_subscription(&route, req, Utc::now()).unwrap();
        assert!(rides.len() <= MAX_SUBSCRIPTION_DAYS as usize);
    }

    #[test]
    fn test_pickup_must_precede_drop() {
        let route = route();
        assert!(resolve_stop_pair(&route, "Koramangala", "Marathahalli").is_ok());
        assert!(matches!(
            resolve_stop_pair(&route, "Marathahalli", "Indiranagar"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            resolve_stop_pair(&route, "Whitefield", "Whitefield"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            resolve_stop_pair(&route, "Hebbal", "Whitefield"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_build_weekly_subscription() {
        let route = route();
        let (subscription, rides) = build_subscription(&route, request(), Utc::now()).unwrap();

        assert_eq!(subscription.end_date, date("2024-03-11"));
        assert_eq!(subscription.pickup_stop, "Indiranagar");
        assert!(subscription.distance_km > 0.0);
        assert_eq!(
            rides.iter().map(|r| r.ride_date).collect::<Vec<_>>(),
            vec![date("2024-03-04"), date("2024-03-06"), date("2024-03-08")]
        );
        assert!(rides.iter().all(|r| r.fare == Decimal::from_str("100").unwrap()));
        assert!(rides.iter().all(|r| r.status == RideStatus::Scheduled));
    }

    #[test]
    fn test_build_rejects_empty_schedule() {
        let route = route();
        let mut req = request();
        req.plan_type = PlanType::Daily;
        // martes: un plan diario desde martes nunca cae en lunes/miércoles/viernes
        req.start_date = date("2024-03-05");
        assert!(matches!(
            build_subscription(&route, req, Utc::now()),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_build_rejects_inactive_route() {
        let mut route = route();
        route.active = false;
        assert!(matches!(
            build_subscription(&route, request(), Utc::now()),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn test_total_refund() {
        let route = route();
        let (_, mut rides) = build_subscription(&route, request(), Utc::now()).unwrap();
        let ratio = Decimal::from_str("0.5").unwrap();
        for ride in rides.iter_mut().skip(1) {
            ride.refund_amount = Some(refund_amount(ride.fare, ratio));
        }
        assert_eq!(total_refund(&rides), Decimal::from_str("100").unwrap());
    }
}
