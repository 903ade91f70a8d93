use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::register,
        api::auth::login,
        api::sensors::list_sensors,
        api::sensors::create_sensor,
        api::sensors::submit_reading,
        api::alerts::list_alerts,
        api::alerts::acknowledge_alert,
        api::alerts::statistics,
    ),
    tags(
        (name = "estate-sentry", description = "Estate Sentry home security API")
    )
)]
pub struct ApiDoc;
