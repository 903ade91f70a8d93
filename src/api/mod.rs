pub mod alerts;
pub mod auth;
pub mod error;
pub mod extract;
pub mod health;
pub mod readings;
pub mod sensors;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::infrastructure::AppState;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, ApiPath, ApiQuery};

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route(
            "/auth/user",
            get(auth::get_me).put(auth::update_me).patch(auth::update_me),
        )
        // Sensors
        .route(
            "/sensors",
            get(sensors::list_sensors).post(sensors::create_sensor),
        )
        .route(
            "/sensors/:id",
            get(sensors::get_sensor)
                .put(sensors::update_sensor)
                .patch(sensors::update_sensor)
                .delete(sensors::delete_sensor),
        )
        .route("/sensors/:id/readings", post(sensors::submit_reading))
        .route(
            "/sensors/:id/reading_history",
            get(sensors::reading_history),
        )
        // Readings (read-only)
        .route("/readings", get(readings::list_readings))
        .route("/readings/:id", get(readings::get_reading))
        // Alerts
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts/statistics", get(alerts::statistics))
        .route("/alerts/:id", get(alerts::get_alert))
        .route("/alerts/:id/acknowledge", patch(alerts::acknowledge_alert))
        .with_state(state)
}
