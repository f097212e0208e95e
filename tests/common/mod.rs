#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use shuttle_rides::config::EnvironmentConfig;
use shuttle_rides::models::assignment::Assignment;
use shuttle_rides::models::route_template::{GeoPoint, RouteStop, RouteTemplate};
use shuttle_rides::models::user::{User, UserRole};
use shuttle_rides::models::vehicle::Vehicle;
use shuttle_rides::routes::create_app_router;
use shuttle_rides::state::AppState;
use shuttle_rides::utils::jwt::generate_token;

pub const PASSWORD: &str = "password123";

/// Aplicación completa sobre el backend en memoria
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(EnvironmentConfig {
            bcrypt_cost: 4,
            ..EnvironmentConfig::default()
        })
    }

    pub fn with_config(config: EnvironmentConfig) -> Self {
        let state = AppState::in_memory(config);
        let router = create_app_router(state.clone());
        Self { state, router }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    /// Usuario persistido directamente y su token
    pub async fn seed_user(&self, role: UserRole) -> (User, String) {
        let email = format!("{}-{}@example.com", role.as_str(), Uuid::new_v4().simple());
        let hash = bcrypt::hash(PASSWORD, 4).unwrap();
        let license = (role == UserRole::Driver).then(|| "KA-2020-0001".to_string());
        let user = User::new(format!("Test {}", role.as_str()), email, hash, role, None, license);
        let user = self.state.users.create(&user).await.unwrap();
        let token = generate_token(user.id, user.role, &self.state.jwt).unwrap();
        (user, token)
    }

    /// Depot -> Stop A -> Stop B -> Campus (4 posiciones)
    pub async fn seed_route(&self) -> RouteTemplate {
        let now = Utc::now();
        let route = RouteTemplate {
            id: Uuid::new_v4(),
            name: format!("Ruta {}", Uuid::new_v4().simple()),
            start_point: GeoPoint {
                name: "Depot".to_string(),
                lat: 12.9352,
                lng: 77.6245,
            },
            end_point: GeoPoint {
                name: "Campus".to_string(),
                lat: 12.9698,
                lng: 77.7500,
            },
            stops: vec![
                RouteStop {
                    name: "Stop B".to_string(),
                    lat: 12.9600,
                    lng: 77.7000,
                    order: 1,
                },
                RouteStop {
                    name: "Stop A".to_string(),
                    lat: 12.9500,
                    lng: 77.6600,
                    order: 0,
                },
            ],
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.state.routes.create(&route).await.unwrap()
    }

    pub async fn seed_vehicle(&self) -> Vehicle {
        let registration = format!("KA01AB{}", &Uuid::new_v4().simple().to_string()[..4]).to_uppercase();
        let vehicle = Vehicle::new(registration, Some("Force Traveller".to_string()), 12);
        self.state.vehicles.create(&vehicle).await.unwrap()
    }

    pub async fn seed_assignment(&self, driver_id: Uuid, route_id: Uuid, date: NaiveDate) -> Assignment {
        let start = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
        self.seed_assignment_at(driver_id, route_id, date, start).await
    }

    pub async fn seed_assignment_at(
        &self,
        driver_id: Uuid,
        route_id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
    ) -> Assignment {
        let vehicle = self.seed_vehicle().await;
        let assignment = Assignment::new(driver_id, route_id, vehicle.id, date, start);
        self.state.assignments.create(&assignment).await.unwrap()
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
