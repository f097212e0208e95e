mod common;

use axum::http::{Method, StatusCode};
use chrono::NaiveTime;
use futures::future::join_all;
use serde_json::json;

use common::{today, TestApp};
use shuttle_rides::models::user::UserRole;

#[tokio::test]
async fn test_walks_every_position_until_completed() {
    let app = TestApp::new();
    let (driver, token) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let assignment = app.seed_assignment(driver.id, route.id, today()).await;
    let base = format!("/api/driver/assignments/{}", assignment.id);

    let (status, body) = app.get(&format!("{}/next-stop", base), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalStops"], 4);
    assert_eq!(body["nextStop"]["name"], "Depot");
    assert_eq!(body["nextStop"]["kind"], "start");

    let expected = [(1, "in-progress", "Stop A"), (2, "in-progress", "Stop B"), (3, "in-progress", "Campus")];
    for (index, (current, state, next)) in expected.iter().enumerate() {
        let (status, body) = app
            .put(&format!("{}/progress", base), &token, json!({ "stopIndex": index }))
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["data"]["currentStopIndex"], *current);
        assert_eq!(body["data"]["status"], *state);
        assert_eq!(body["data"]["nextStop"]["name"], *next);
    }

    let (status, body) = app.put(&format!("{}/progress", base), &token, json!({ "stopIndex": 3 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["currentStopIndex"], 4);
    assert_eq!(body["data"]["status"], "completed");
    assert!(body["data"]["nextStop"].is_null());
    assert_eq!(body["data"]["completedStops"].as_array().unwrap().len(), 4);

    let (_, body) = app.get(&format!("{}/next-stop", base), &token).await;
    assert_eq!(body["finished"], true);
}

#[tokio::test]
async fn test_skipping_a_stop_is_rejected_and_state_unchanged() {
    let app = TestApp::new();
    let (driver, token) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let assignment = app.seed_assignment(driver.id, route.id, today()).await;
    let base = format!("/api/driver/assignments/{}", assignment.id);

    let (status, body) = app.put(&format!("{}/progress", base), &token, json!({ "stopIndex": 2 })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "OUT_OF_ORDER_PROGRESS");
    assert_eq!(body["retryable"], true);

    let (_, body) = app.get(&base, &token).await;
    assert_eq!(body["currentStopIndex"], 0);
    assert_eq!(body["status"], "scheduled");
    assert_eq!(body["version"], 0);
}

#[tokio::test]
async fn test_completed_assignment_cannot_advance() {
    let app = TestApp::new();
    let (driver, token) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let assignment = app.seed_assignment(driver.id, route.id, today()).await;
    let base = format!("/api/driver/assignments/{}", assignment.id);

    let (status, _) = app.put(&format!("{}/status", base), &token, json!({ "status": "completed" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.put(&format!("{}/progress", base), &token, json!({ "stopIndex": 0 })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_reset_returns_to_scheduled() {
    let app = TestApp::new();
    let (driver, token) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let assignment = app.seed_assignment(driver.id, route.id, today()).await;
    let base = format!("/api/driver/assignments/{}", assignment.id);

    for index in 0..3 {
        let (status, _) = app.put(&format!("{}/progress", base), &token, json!({ "stopIndex": index })).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app.post(&format!("{}/reset", base), &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["currentStopIndex"], 0);
    assert_eq!(body["data"]["status"], "scheduled");
    assert!(body["data"]["completedStops"].as_array().unwrap().is_empty());

    // Tras reiniciar se vuelve a empezar por la primera posición
    let (status, _) = app.put(&format!("{}/progress", base), &token, json!({ "stopIndex": 0 })).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_set_status_scheduled_restarts_progress() {
    let app = TestApp::new();
    let (driver, token) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let assignment = app.seed_assignment(driver.id, route.id, today()).await;
    let base = format!("/api/driver/assignments/{}", assignment.id);

    for index in 0..2 {
        app.put(&format!("{}/progress", base), &token, json!({ "stopIndex": index })).await;
    }

    let (status, body) = app.put(&format!("{}/status", base), &token, json!({ "status": "scheduled" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "scheduled");
    assert_eq!(body["data"]["currentStopIndex"], 0);
    assert!(body["data"]["completedStops"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_set_status_in_progress_keeps_index() {
    let app = TestApp::new();
    let (driver, token) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let assignment = app.seed_assignment(driver.id, route.id, today()).await;
    let base = format!("/api/driver/assignments/{}", assignment.id);

    // Override manual: se acepta aunque no haya paradas completadas
    let (status, body) = app.put(&format!("{}/status", base), &token, json!({ "status": "in-progress" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "in-progress");
    assert_eq!(body["data"]["currentStopIndex"], 0);
}

#[tokio::test]
async fn test_unknown_status_is_invalid_state() {
    let app = TestApp::new();
    let (driver, token) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let assignment = app.seed_assignment(driver.id, route.id, today()).await;

    let (status, body) = app
        .put(
            &format!("/api/driver/assignments/{}/status", assignment.id),
            &token,
            json!({ "status": "paused" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_concurrent_advances_have_one_winner() {
    let app = TestApp::new();
    let (driver, token) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let assignment = app.seed_assignment(driver.id, route.id, today()).await;
    let progress = format!("/api/driver/assignments/{}/progress", assignment.id);

    let (status, _) = app.put(&progress, &token, json!({ "stopIndex": 0 })).await;
    assert_eq!(status, StatusCode::OK);

    let results = join_all((0..2).map(|_| app.put(&progress, &token, json!({ "stopIndex": 1 })))).await;

    let winners = results.iter().filter(|(status, _)| *status == StatusCode::OK).count();
    assert_eq!(winners, 1);
    let (status, body) = results
        .iter()
        .find(|(status, _)| *status != StatusCode::OK)
        .unwrap();
    assert_eq!(*status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "OUT_OF_ORDER_PROGRESS");

    let (_, body) = app.get(&format!("/api/driver/assignments/{}", assignment.id), &token).await;
    assert_eq!(body["currentStopIndex"], 2);
    assert_eq!(body["completedStops"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_other_drivers_assignment_is_not_found() {
    let app = TestApp::new();
    let (owner, _) = app.seed_user(UserRole::Driver).await;
    let (_, intruder_token) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let assignment = app.seed_assignment(owner.id, route.id, today()).await;

    let (status, _) = app
        .get(&format!("/api/driver/assignments/{}", assignment.id), &intruder_token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .put(
            &format!("/api/driver/assignments/{}/progress", assignment.id),
            &intruder_token,
            json!({ "stopIndex": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_riders_cannot_use_driver_endpoints() {
    let app = TestApp::new();
    let (_, rider_token) = app.seed_user(UserRole::Rider).await;

    let (status, body) = app.get("/api/driver/assignments", &rider_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = app.request(Method::GET, "/api/driver/assignments", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_driver_list_is_filtered_and_ordered() {
    let app = TestApp::new();
    let (driver, token) = app.seed_user(UserRole::Driver).await;
    let (other, _) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let tomorrow = today().succ_opt().unwrap();

    // el turno de tarde se crea antes que el de mañana
    let evening = app
        .seed_assignment_at(driver.id, route.id, today(), NaiveTime::from_hms_opt(17, 45, 0).unwrap())
        .await;
    let morning = app
        .seed_assignment_at(driver.id, route.id, today(), NaiveTime::from_hms_opt(6, 15, 0).unwrap())
        .await;
    app.seed_assignment(other.id, route.id, today()).await;
    let next_day = app.seed_assignment(driver.id, route.id, tomorrow).await;

    let (status, body) = app.get("/api/driver/assignments", &token).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    let ids: Vec<&str> = list.iter().map(|a| a["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![morning.id.to_string(), evening.id.to_string()]);
    assert_eq!(list[0]["scheduledStartTime"], "06:15");
    assert_eq!(list[1]["scheduledStartTime"], "17:45");
    assert_eq!(list[0]["route"]["name"], route.name);

    let (status, body) = app
        .get(&format!("/api/driver/assignments?date={}", tomorrow.format("%Y-%m-%d")), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], next_day.id.to_string());
    assert_eq!(list[0]["scheduledStartTime"], "07:30");

    let (_, body) = app.get("/api/driver/assignments?status=completed", &token).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = app.get("/api/driver/assignments?status=bogus", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reopened_route_cannot_pass_its_last_stop() {
    let app = TestApp::new();
    let (driver, token) = app.seed_user(UserRole::Driver).await;
    let route = app.seed_route().await;
    let assignment = app.seed_assignment(driver.id, route.id, today()).await;
    let base = format!("/api/driver/assignments/{}", assignment.id);

    for index in 0..4 {
        let (status, body) = app.put(&format!("{}/progress", base), &token, json!({ "stopIndex": index })).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }

    let (status, body) = app
        .put(&format!("{}/status", base), &token, json!({ "status": "in-progress" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "in-progress");
    assert_eq!(body["data"]["currentStopIndex"], 4);

    let (status, body) = app.put(&format!("{}/progress", base), &token, json!({ "stopIndex": 4 })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_STATE");

    let (_, body) = app.get(&base, &token).await;
    assert_eq!(body["currentStopIndex"], 4);
    assert_eq!(body["status"], "in-progress");
    assert_eq!(body["completedStops"].as_array().unwrap().len(), 4);
}
