mod common;

use axum::http::{Method, StatusCode};
use chrono::{Datelike, Duration, Weekday};
use serde_json::json;

use common::{today, TestApp, PASSWORD};
use shuttle_rides::config::EnvironmentConfig;
use shuttle_rides::models::user::UserRole;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Asha", "email": "Asha@Example.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["role"], "rider");
    assert_eq!(body["data"]["email"], "asha@example.com");
    assert!(body["data"].get("passwordHash").is_none());

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "asha@example.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Asha");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Asha", "email": "asha@example.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_bad_credentials_and_tokens() {
    let app = TestApp::new();
    let (user, _) = app.seed_user(UserRole::Rider).await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": user.email, "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/me", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_endpoints_are_rate_limited() {
    let app = TestApp::with_config(EnvironmentConfig {
        bcrypt_cost: 4,
        rate_limit_requests: 2,
        ..EnvironmentConfig::default()
    });
    let login = json!({ "email": "nobody@example.com", "password": PASSWORD });

    for _ in 0..2 {
        let (status, _) = app
            .request(Method::POST, "/api/auth/login", None, Some(login.clone()))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, body) = app
        .request(Method::POST, "/api/auth/login", None, Some(login))
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn test_admin_builds_a_route_day() {
    let app = TestApp::new();
    let (_, admin) = app.seed_user(UserRole::Admin).await;

    let (status, body) = app
        .post(
            "/api/routes",
            &admin,
            json!({
                "name": "Koramangala - Whitefield",
                "startPoint": { "name": "Koramangala", "lat": 12.9352, "lng": 77.6245 },
                "endPoint": { "name": "Whitefield", "lat": 12.9698, "lng": 77.7500 },
                "stops": [
                    { "name": "Marathahalli", "lat": 12.9591, "lng": 77.6974, "order": 1 },
                    { "name": "HAL", "lat": 12.9592, "lng": 77.6650, "order": 0 }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["totalStops"], 4);
    assert_eq!(body["data"]["sequence"][1]["name"], "HAL");
    let route_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/drivers",
            &admin,
            json!({
                "name": "Ravi",
                "email": "ravi@example.com",
                "password": PASSWORD,
                "licenseNumber": "KA-2020-0001"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["role"], "driver");
    let driver_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/vehicles",
            &admin,
            json!({ "registrationNumber": "ka01 ab 1234", "model": "Force Traveller", "capacity": 12 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["registrationNumber"], "KA01 AB 1234");
    let vehicle_id = body["data"]["id"].as_str().unwrap().to_string();

    let date = today();
    let (status, body) = app
        .post(
            "/api/assignments",
            &admin,
            json!({
                "driverId": driver_id,
                "routeId": route_id,
                "vehicleId": vehicle_id,
                "scheduledDate": date.to_string(),
                "scheduledStartTime": "07:00"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "scheduled");
    assert_eq!(body["data"]["totalStops"], 4);

    let (status, body) = app
        .get(&format!("/api/assignments?date={}", date), &admin)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // El conductor ve su assignment del día tras hacer login
    let (_, login) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ravi@example.com", "password": PASSWORD })),
        )
        .await;
    let driver_token = login["token"].as_str().unwrap();
    let (_, mine) = app.get("/api/driver/assignments", driver_token).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bulk_assignments_follow_weekdays() {
    let app = TestApp::new();
    let (_, admin) = app.seed_user(UserRole::Admin).await;
    let (driver, _) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let vehicle = app.seed_vehicle().await;

    let mut start = today() + Duration::days(1);
    while start.weekday() != Weekday::Mon {
        start = start.succ_opt().unwrap();
    }

    let (status, body) = app
        .post(
            "/api/assignments/bulk",
            &admin,
            json!({
                "driverId": driver.id,
                "routeId": route.id,
                "vehicleId": vehicle.id,
                "startDate": start.to_string(),
                "endDate": (start + Duration::days(14)).to_string(),
                "days": ["monday", "thursday"],
                "scheduledStartTime": "06:45"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let (status, _) = app
        .post(
            "/api/assignments/bulk",
            &admin,
            json!({
                "driverId": driver.id,
                "routeId": route.id,
                "vehicleId": vehicle.id,
                "startDate": start.to_string(),
                "endDate": start.to_string(),
                "days": ["monday"],
                "scheduledStartTime": "06:45"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_assignment_requires_active_references() {
    let app = TestApp::new();
    let (_, admin) = app.seed_user(UserRole::Admin).await;
    let (rider, _) = app.seed_user(UserRole::Rider).await;
    let (driver, _) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let vehicle = app.seed_vehicle().await;

    let request = |driver_id: uuid::Uuid| {
        json!({
            "driverId": driver_id,
            "routeId": route.id,
            "vehicleId": vehicle.id,
            "scheduledDate": today().to_string(),
            "scheduledStartTime": "07:00"
        })
    };

    let (status, _) = app.post("/api/assignments", &admin, request(rider.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/vehicles/{}", vehicle.id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.post("/api/assignments", &admin, request(driver.id)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_route_administration_is_admin_only() {
    let app = TestApp::new();
    let (_, admin) = app.seed_user(UserRole::Admin).await;
    let (_, rider) = app.seed_user(UserRole::Rider).await;
    let route = app.seed_route().await;

    let (status, _) = app
        .post(
            "/api/routes",
            &rider,
            json!({
                "name": "Ruta pirata",
                "startPoint": { "name": "A", "lat": 1.0, "lng": 1.0 },
                "endPoint": { "name": "B", "lat": 2.0, "lng": 2.0 }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/vehicles", &rider).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/routes/{}", route.id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], false);

    let (_, listed) = app.get("/api/routes?include_inactive=true", &rider).await;
    assert!(listed.as_array().unwrap().is_empty());
    let (status, _) = app.get(&format!("/api/routes/{}", route.id), &rider).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = app.get("/api/routes?include_inactive=true", &admin).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}
