use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use estate_sentry::api;
use estate_sentry::db;
use estate_sentry::infrastructure::AppState;
use estate_sentry::models::sensor_reading;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

async fn setup_app() -> Router {
    setup_app_with_db().await.0
}

async fn setup_app_with_db() -> (Router, DatabaseConnection) {
    // In-memory SQLite for testing
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    (api::api_router(AppState::new(db.clone())), db)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn register(app: &Router, username: &str) -> String {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "username": username, "password": "pw" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    body["token"].as_str().unwrap().to_string()
}

async fn create_sensor(app: &Router, token: &str, payload: Value) -> i64 {
    let (status, body) = send(app, "POST", "/sensors", token, Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

fn front_door() -> Value {
    json!({
        "name": "Front Door",
        "sensor_type": "DOOR_CONTACT",
        "location": "front hall"
    })
}

#[tokio::test]
async fn test_sensor_crud() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;

    let (status, created) = send(&app, "POST", "/sensors", &token, Some(front_door())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "ACTIVE");
    assert_eq!(created["sensor_type_display"], "Door Contact");
    assert_eq!(created["status_display"], "Active");
    assert_eq!(created["owner_username"], "owner");
    assert_eq!(created["connection_config"], json!({}));
    let id = created["id"].as_i64().unwrap();

    let (status, list) = send(&app, "GET", "/sensors", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/sensors/{}", id),
        &token,
        Some(json!({ "status": "MAINTENANCE", "metadata": { "floor": 1 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "MAINTENANCE");
    assert_eq!(updated["name"], "Front Door");
    assert_eq!(updated["metadata"]["floor"], 1);

    let (status, fetched) = send(&app, "GET", &format!("/sensors/{}", id), &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "MAINTENANCE");

    let (status, _) = send(&app, "DELETE", &format!("/sensors/{}", id), &token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/sensors/{}", id), &token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sensor_filters() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;

    create_sensor(&app, &token, front_door()).await;
    create_sensor(
        &app,
        &token,
        json!({ "name": "Cam", "sensor_type": "CAMERA", "location": "yard", "status": "INACTIVE" }),
    )
    .await;

    let (_, cams) = send(&app, "GET", "/sensors?sensor_type=camera", &token, None).await;
    let cams = cams.as_array().unwrap();
    assert_eq!(cams.len(), 1);
    assert_eq!(cams[0]["name"], "Cam");

    let (_, active) = send(&app, "GET", "/sensors?status=ACTIVE", &token, None).await;
    let active = active.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["name"], "Front Door");
}

#[tokio::test]
async fn test_invalid_sensor_definition() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;

    let (status, body) = send(
        &app,
        "POST",
        "/sensors",
        &token,
        Some(json!({ "name": "X", "sensor_type": "LASER", "location": "attic" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "sensor_type");

    let (status, body) = send(
        &app,
        "POST",
        "/sensors",
        &token,
        Some(json!({ "sensor_type": "CAMERA", "location": "attic" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "name");

    let (status, body) = send(
        &app,
        "POST",
        "/sensors",
        &token,
        Some(json!({
            "name": "X",
            "sensor_type": "CAMERA",
            "location": "attic",
            "connection_config": [1, 2]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "connection_config");
}

#[tokio::test]
async fn test_door_opening_raises_alert() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;
    let id = create_sensor(&app, &token, front_door()).await;

    let (status, reading) = send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", id),
        &token,
        Some(json!({
            "value": { "state": "open", "battery_level": 87, "extra": "dropped" },
            "reading_type": "state_change"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{reading}");
    assert_eq!(reading["processed"], true);
    assert_eq!(reading["sensor"], id);
    assert_eq!(reading["sensor_name"], "Front Door");
    assert_eq!(reading["value"]["state"], "open");
    assert_eq!(reading["value"]["sensor_battery"], 87);
    assert!(reading["value"].get("extra").is_none());

    let (_, alerts) = send(&app, "GET", "/alerts", &token, None).await;
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    let alert = &alerts[0];
    assert_eq!(alert["alert_type"], "DOOR_OPEN");
    assert_eq!(alert["alert_type_display"], "Door Opened");
    assert_eq!(alert["severity"], "MEDIUM");
    assert_eq!(alert["title"], "Front Door Opened");
    assert_eq!(alert["description"], "The front hall door contact was opened.");
    assert_eq!(alert["sensor"], id);
    assert_eq!(alert["sensor_name"], "Front Door");
    assert_eq!(alert["acknowledged"], false);
    assert_eq!(alert["metadata"]["reading_id"], reading["id"]);
}

#[tokio::test]
async fn test_closed_contact_and_window_alerts() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;
    let door = create_sensor(&app, &token, front_door()).await;
    let window = create_sensor(
        &app,
        &token,
        json!({ "name": "Back Window", "sensor_type": "WINDOW_CONTACT", "location": "kitchen" }),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", door),
        &token,
        Some(json!({ "value": { "state": "closed" } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, alerts) = send(&app, "GET", "/alerts", &token, None).await;
    assert!(alerts.as_array().unwrap().is_empty());

    send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", window),
        &token,
        Some(json!({ "value": { "state": "open" } })),
    )
    .await;

    let (_, alerts) = send(&app, "GET", "/alerts", &token, None).await;
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["alert_type"], "WINDOW_OPEN");
}

#[tokio::test]
async fn test_camera_motion_raises_low_alert() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;
    let cam = create_sensor(
        &app,
        &token,
        json!({ "name": "Driveway Cam", "sensor_type": "CAMERA", "location": "driveway" }),
    )
    .await;

    let (status, reading) = send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", cam),
        &token,
        Some(json!({ "value": { "image_url": "http://cam/1.jpg" } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reading["value"]["motion_detected"], false);
    assert_eq!(reading["value"]["metadata"], json!({}));

    send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", cam),
        &token,
        Some(json!({ "value": { "motion_detected": true, "image_url": "http://cam/2.jpg" } })),
    )
    .await;

    let (_, alerts) = send(&app, "GET", "/alerts", &token, None).await;
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["alert_type"], "MOTION");
    assert_eq!(alerts[0]["severity"], "LOW");
    assert_eq!(alerts[0]["title"], "Motion Detected at Driveway Cam");
    assert_eq!(alerts[0]["metadata"]["image_url"], "http://cam/2.jpg");
}

#[tokio::test]
async fn test_handler_class_override() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;
    let sensor = create_sensor(
        &app,
        &token,
        json!({
            "name": "Garage Tilt",
            "sensor_type": "GLASS_BREAK",
            "location": "garage",
            "handler_class": "ContactHandler"
        }),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", sensor),
        &token,
        Some(json!({ "value": { "state": "ajar" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "State must be 'open' or 'closed'");
}

#[tokio::test]
async fn test_unhandled_sensor_stores_raw_reading() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;
    let thermo = create_sensor(
        &app,
        &token,
        json!({ "name": "Hall Thermostat", "sensor_type": "TEMPERATURE", "location": "hall" }),
    )
    .await;

    let value = json!({ "celsius": 21.5, "humidity": [40, 41] });
    let (status, reading) = send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", thermo),
        &token,
        Some(json!({ "value": value })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reading["value"], value);
    assert_eq!(reading["processed"], true);

    let (_, alerts) = send(&app, "GET", "/alerts", &token, None).await;
    assert!(alerts.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_reading_is_rejected_and_not_stored() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;
    let id = create_sensor(&app, &token, front_door()).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", id),
        &token,
        Some(json!({ "value": { "battery_level": 50 } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "value");
    assert_eq!(body["error"], "Missing 'state' field");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", id),
        &token,
        Some(json!({ "value": "open" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Data must be a dictionary");

    let (_, history) = send(
        &app,
        "GET",
        &format!("/sensors/{}/reading_history", id),
        &token,
        None,
    )
    .await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reading_history_and_listing() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;
    let door = create_sensor(&app, &token, front_door()).await;
    let cam = create_sensor(
        &app,
        &token,
        json!({ "name": "Cam", "sensor_type": "CAMERA", "location": "yard" }),
    )
    .await;

    for state in ["open", "closed", "open"] {
        send(
            &app,
            "POST",
            &format!("/sensors/{}/readings", door),
            &token,
            Some(json!({ "value": { "state": state } })),
        )
        .await;
    }
    send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", cam),
        &token,
        Some(json!({ "value": { "motion_detected": false } })),
    )
    .await;

    let (status, history) = send(
        &app,
        "GET",
        &format!("/sensors/{}/reading_history", door),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 3);
    // Newest first
    assert_eq!(history[0]["value"]["state"], "open");
    assert_eq!(history[1]["value"]["state"], "closed");

    let (_, all) = send(&app, "GET", "/readings", &token, None).await;
    assert_eq!(all.as_array().unwrap().len(), 4);

    let (_, only_cam) = send(
        &app,
        "GET",
        &format!("/readings?sensor_id={}", cam),
        &token,
        None,
    )
    .await;
    let only_cam = only_cam.as_array().unwrap();
    assert_eq!(only_cam.len(), 1);
    assert_eq!(only_cam[0]["sensor_name"], "Cam");

    let (_, limited) = send(&app, "GET", "/readings?limit=2", &token, None).await;
    assert_eq!(limited.as_array().unwrap().len(), 2);

    let (_, unprocessed) = send(&app, "GET", "/readings?processed=false", &token, None).await;
    assert!(unprocessed.as_array().unwrap().is_empty());

    let reading_id = only_cam[0]["id"].as_i64().unwrap();
    let (status, reading) = send(
        &app,
        "GET",
        &format!("/readings/{}", reading_id),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reading["sensor"], cam);
}

#[tokio::test]
async fn test_owner_isolation() {
    let app = setup_app().await;
    let alice = register(&app, "alice").await;
    let mallory = register(&app, "mallory").await;

    let door = create_sensor(&app, &alice, front_door()).await;
    let (_, reading) = send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", door),
        &alice,
        Some(json!({ "value": { "state": "open" } })),
    )
    .await;
    let (_, alerts) = send(&app, "GET", "/alerts", &alice, None).await;
    let alert_id = alerts[0]["id"].as_i64().unwrap();
    let reading_id = reading["id"].as_i64().unwrap();

    for (method, uri) in [
        ("GET", format!("/sensors/{}", door)),
        ("DELETE", format!("/sensors/{}", door)),
        ("GET", format!("/sensors/{}/reading_history", door)),
        ("GET", format!("/readings/{}", reading_id)),
        ("GET", format!("/alerts/{}", alert_id)),
        ("PATCH", format!("/alerts/{}/acknowledge", alert_id)),
    ] {
        let (status, _) = send(&app, method, &uri, &mallory, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
    }

    let (status, _) = send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", door),
        &mallory,
        Some(json!({ "value": { "state": "open" } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, sensors) = send(&app, "GET", "/sensors", &mallory, None).await;
    assert!(sensors.as_array().unwrap().is_empty());
    let (_, readings) = send(&app, "GET", "/readings", &mallory, None).await;
    assert!(readings.as_array().unwrap().is_empty());
    let (_, stats) = send(&app, "GET", "/alerts/statistics", &mallory, None).await;
    assert_eq!(stats["total_alerts"], 0);
}

#[tokio::test]
async fn test_acknowledge_alert() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;
    let door = create_sensor(&app, &token, front_door()).await;
    send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", door),
        &token,
        Some(json!({ "value": { "state": "open" } })),
    )
    .await;

    let (_, alerts) = send(&app, "GET", "/alerts", &token, None).await;
    let alert_id = alerts[0]["id"].as_i64().unwrap();

    let (status, acked) = send(
        &app,
        "PATCH",
        &format!("/alerts/{}/acknowledge", alert_id),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(acked["acknowledged"], true);
    assert_eq!(acked["acknowledged_by_username"], "owner");
    assert!(acked["acknowledged_at"].as_str().is_some());

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/alerts/{}/acknowledge", alert_id),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Alert already acknowledged");

    let (status, _) = send(&app, "PATCH", "/alerts/9999/acknowledge", &token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_alert_filters_and_statistics() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;
    let door = create_sensor(&app, &token, front_door()).await;
    let cam = create_sensor(
        &app,
        &token,
        json!({ "name": "Cam", "sensor_type": "CAMERA", "location": "yard" }),
    )
    .await;

    for _ in 0..2 {
        send(
            &app,
            "POST",
            &format!("/sensors/{}/readings", door),
            &token,
            Some(json!({ "value": { "state": "open" } })),
        )
        .await;
    }
    send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", cam),
        &token,
        Some(json!({ "value": { "motion_detected": "yes" } })),
    )
    .await;

    let (_, medium) = send(&app, "GET", "/alerts?severity=medium", &token, None).await;
    assert_eq!(medium.as_array().unwrap().len(), 2);

    let (_, unknown) = send(&app, "GET", "/alerts?severity=APOCALYPTIC", &token, None).await;
    assert!(unknown.as_array().unwrap().is_empty());

    let (_, all) = send(&app, "GET", "/alerts", &token, None).await;
    let first_id = all[0]["id"].as_i64().unwrap();
    send(
        &app,
        "PATCH",
        &format!("/alerts/{}/acknowledge", first_id),
        &token,
        None,
    )
    .await;

    let (_, acked) = send(&app, "GET", "/alerts?acknowledged=true", &token, None).await;
    assert_eq!(acked.as_array().unwrap().len(), 1);
    let (_, open) = send(&app, "GET", "/alerts?acknowledged=false", &token, None).await;
    assert_eq!(open.as_array().unwrap().len(), 2);

    let (status, stats) = send(&app, "GET", "/alerts/statistics", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_alerts"], 3);
    assert_eq!(stats["unacknowledged_alerts"], 2);
    assert_eq!(stats["by_severity"]["MEDIUM"], 2);
    assert_eq!(stats["by_severity"]["LOW"], 1);
    assert_eq!(stats["recent_alerts"].as_array().unwrap().len(), 3);
    assert_eq!(stats["recent_alerts"][0]["severity_display"].is_string(), true);
}

#[tokio::test]
async fn test_deleting_sensor_cascades() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;
    let door = create_sensor(&app, &token, front_door()).await;
    send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", door),
        &token,
        Some(json!({ "value": { "state": "open" } })),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/sensors/{}", door), &token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, readings) = send(&app, "GET", "/readings", &token, None).await;
    assert!(readings.as_array().unwrap().is_empty());
    let (_, alerts) = send(&app, "GET", "/alerts", &token, None).await;
    assert!(alerts.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_null_handler_class_clears_override() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;
    let cam = create_sensor(
        &app,
        &token,
        json!({
            "name": "Porch Cam",
            "sensor_type": "CAMERA",
            "location": "porch",
            "handler_class": "ContactHandler"
        }),
    )
    .await;

    // Contact rules apply while the override is set
    let (status, _) = send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", cam),
        &token,
        Some(json!({ "value": { "motion_detected": true } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Omitting the key leaves it alone
    let (_, untouched) = send(
        &app,
        "PATCH",
        &format!("/sensors/{}", cam),
        &token,
        Some(json!({ "location": "front porch" })),
    )
    .await;
    assert_eq!(untouched["handler_class"], "ContactHandler");

    let (status, cleared) = send(
        &app,
        "PATCH",
        &format!("/sensors/{}", cam),
        &token,
        Some(json!({ "handler_class": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["handler_class"], Value::Null);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/sensors/{}/readings", cam),
        &token,
        Some(json!({ "value": { "motion_detected": true } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, alerts) = send(&app, "GET", "/alerts", &token, None).await;
    assert_eq!(alerts[0]["alert_type"], "MOTION");
}

#[tokio::test]
async fn test_statistics_keeps_ten_recent_alerts() {
    let app = setup_app().await;
    let token = register(&app, "owner").await;
    let door = create_sensor(&app, &token, front_door()).await;

    for _ in 0..12 {
        let (status, _) = send(
            &app,
            "POST",
            &format!("/sensors/{}/readings", door),
            &token,
            Some(json!({ "value": { "state": "open" } })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = send(&app, "GET", "/alerts", &token, None).await;
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 12);

    let (_, stats) = send(&app, "GET", "/alerts/statistics", &token, None).await;
    assert_eq!(stats["total_alerts"], 12);
    assert_eq!(stats["unacknowledged_alerts"], 12);
    let recent = stats["recent_alerts"].as_array().unwrap();
    assert_eq!(recent.len(), 10);
    // The newest ten, newest first
    assert_eq!(recent[0]["id"], all[0]["id"]);
    assert_eq!(recent[9]["id"], all[9]["id"]);
}

#[tokio::test]
async fn test_reading_limits() {
    let (app, db) = setup_app_with_db().await;
    let token = register(&app, "owner").await;
    let door = create_sensor(&app, &token, front_door()).await;

    for chunk in 0..6 {
        let rows = (0..100).map(|i| sensor_reading::ActiveModel {
            sensor_id: Set(door as i32),
            timestamp: Set(format!("2024-05-01T12:{:02}:{:02}.000000Z", chunk, i % 60)),
            value: Set(json!({ "state": "closed", "n": chunk * 100 + i }).to_string()),
            reading_type: Set(None),
            processed: Set(true),
            ..Default::default()
        });
        sensor_reading::Entity::insert_many(rows)
            .exec(&db)
            .await
            .expect("Failed to insert readings");
    }

    let (_, history) = send(
        &app,
        "GET",
        &format!("/sensors/{}/reading_history", door),
        &token,
        None,
    )
    .await;
    assert_eq!(history.as_array().unwrap().len(), 100);

    let (_, default_page) = send(&app, "GET", "/readings", &token, None).await;
    assert_eq!(default_page.as_array().unwrap().len(), 100);

    let (_, clamped) = send(&app, "GET", "/readings?limit=1000", &token, None).await;
    assert_eq!(clamped.as_array().unwrap().len(), 500);

    let (_, within) = send(&app, "GET", "/readings?limit=250", &token, None).await;
    assert_eq!(within.as_array().unwrap().len(), 250);

    let (_, at_least_one) = send(&app, "GET", "/readings?limit=0", &token, None).await;
    assert_eq!(at_least_one.as_array().unwrap().len(), 1);
}
