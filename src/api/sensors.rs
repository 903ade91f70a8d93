use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use super::error::ApiResult;
use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::{DomainError, Sensor};
use crate::infrastructure::auth::AuthUser;
use crate::infrastructure::AppState;
use crate::services::reading_service::{self, SubmitReading};
use crate::services::sensor_service::{self, SensorInput};

/// Sensor as returned by the API, with human readable choice labels
#[derive(Serialize)]
pub struct SensorDto {
    #[serde(flatten)]
    sensor: Sensor,
    sensor_type_display: &'static str,
    status_display: &'static str,
}

impl From<Sensor> for SensorDto {
    fn from(sensor: Sensor) -> Self {
        Self {
            sensor_type_display: sensor.sensor_type.display_name(),
            status_display: sensor.status.display_name(),
            sensor,
        }
    }
}

#[derive(Deserialize)]
pub struct SensorsQuery {
    pub sensor_type: Option<String>,
    pub status: Option<String>,
}

/// Distinguishes an explicit `null` (clear the field) from an absent key
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
pub struct SensorRequest {
    name: Option<String>,
    sensor_type: Option<String>,
    location: Option<String>,
    status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    handler_class: Option<Option<String>>,
    connection_config: Option<Value>,
    metadata: Option<Value>,
}

impl From<SensorRequest> for SensorInput {
    fn from(req: SensorRequest) -> Self {
        Self {
            name: req.name,
            sensor_type: req.sensor_type,
            location: req.location,
            status: req.status,
            handler_class: req.handler_class,
            connection_config: req.connection_config,
            metadata: req.metadata,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/sensors",
    params(
        ("sensor_type" = Option<String>, Query, description = "Only sensors of this type"),
        ("status" = Option<String>, Query, description = "Only sensors in this status")
    ),
    responses(
        (status = 200, description = "Sensors owned by the caller, newest first"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_sensors(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<SensorsQuery>,
) -> ApiResult<Json<Vec<SensorDto>>> {
    let sensors = sensor_service::list_sensors(
        state.sensor_repo.as_ref(),
        &auth.user,
        params.sensor_type,
        params.status,
    )
    .await?;

    Ok(Json(sensors.into_iter().map(SensorDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/sensors",
    responses(
        (status = 201, description = "Sensor registered"),
        (status = 400, description = "Invalid sensor definition")
    )
)]
pub async fn create_sensor(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<SensorRequest>,
) -> ApiResult<impl IntoResponse> {
    let sensor =
        sensor_service::create_sensor(state.sensor_repo.as_ref(), &auth.user, payload.into())
            .await?;

    Ok((StatusCode::CREATED, Json(SensorDto::from(sensor))))
}

pub async fn get_sensor(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<SensorDto>> {
    let sensor = sensor_service::get_sensor(state.sensor_repo.as_ref(), &auth.user, id).await?;
    Ok(Json(sensor.into()))
}

pub async fn update_sensor(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<SensorRequest>,
) -> ApiResult<Json<SensorDto>> {
    let sensor =
        sensor_service::update_sensor(state.sensor_repo.as_ref(), &auth.user, id, payload.into())
            .await?;
    Ok(Json(sensor.into()))
}

pub async fn delete_sensor(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<StatusCode> {
    sensor_service::delete_sensor(state.sensor_repo.as_ref(), &auth.user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ReadingRequest {
    value: Option<Value>,
    reading_type: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/sensors/{id}/readings",
    params(("id" = i32, Path, description = "Sensor id")),
    responses(
        (status = 201, description = "Reading stored and processed for threats"),
        (status = 400, description = "Reading rejected by the sensor's handler"),
        (status = 404, description = "No such sensor for this user")
    )
)]
pub async fn submit_reading(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<ReadingRequest>,
) -> ApiResult<impl IntoResponse> {
    let value = payload
        .value
        .ok_or_else(|| DomainError::field("value", "This field is required."))?;

    let ingested = reading_service::submit_reading(
        state.sensor_repo.as_ref(),
        state.reading_repo.as_ref(),
        &auth.user,
        id,
        SubmitReading {
            value,
            reading_type: payload.reading_type,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!(ingested.reading))))
}

pub async fn reading_history(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<Value>> {
    let readings = reading_service::reading_history(
        state.sensor_repo.as_ref(),
        state.reading_repo.as_ref(),
        &auth.user,
        id,
    )
    .await?;

    Ok(Json(json!(readings)))
}
