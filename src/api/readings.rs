use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiResult;
use super::extract::{ApiPath, ApiQuery};
use crate::infrastructure::auth::AuthUser;
use crate::infrastructure::AppState;
use crate::services::alert_service::parse_flag;
use crate::services::reading_service;

#[derive(Deserialize)]
pub struct ReadingsQuery {
    pub sensor_id: Option<i32>,
    pub processed: Option<String>,
    pub limit: Option<u64>,
}

pub async fn list_readings(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<ReadingsQuery>,
) -> ApiResult<Json<Value>> {
    let readings = reading_service::list_readings(
        state.reading_repo.as_ref(),
        &auth.user,
        params.sensor_id,
        params.processed.as_deref().map(parse_flag),
        params.limit,
    )
    .await?;

    Ok(Json(json!(readings)))
}

pub async fn get_reading(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<Value>> {
    let reading = reading_service::get_reading(state.reading_repo.as_ref(), &auth.user, id).await?;
    Ok(Json(json!(reading)))
}
