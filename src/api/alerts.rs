use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::extract::{ApiPath, ApiQuery};
use crate::domain::{Alert, AlertStatistics};
use crate::infrastructure::auth::AuthUser;
use crate::infrastructure::AppState;
use crate::services::alert_service;

/// Alert as returned by the API, with human readable choice labels
#[derive(Serialize)]
pub struct AlertDto {
    #[serde(flatten)]
    alert: Alert,
    alert_type_display: &'static str,
    severity_display: &'static str,
}

impl From<Alert> for AlertDto {
    fn from(alert: Alert) -> Self {
        Self {
            alert_type_display: alert.alert_type.display_name(),
            severity_display: alert.severity.display_name(),
            alert,
        }
    }
}

#[derive(Serialize)]
pub struct StatisticsDto {
    total_alerts: u64,
    unacknowledged_alerts: u64,
    by_severity: std::collections::BTreeMap<String, u64>,
    recent_alerts: Vec<AlertDto>,
}

impl From<AlertStatistics> for StatisticsDto {
    fn from(stats: AlertStatistics) -> Self {
        Self {
            total_alerts: stats.total_alerts,
            unacknowledged_alerts: stats.unacknowledged_alerts,
            by_severity: stats.by_severity,
            recent_alerts: stats.recent_alerts.into_iter().map(AlertDto::from).collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct AlertsQuery {
    pub severity: Option<String>,
    pub acknowledged: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/alerts",
    params(
        ("severity" = Option<String>, Query, description = "Severity code, case-insensitive"),
        ("acknowledged" = Option<String>, Query, description = "true/1/yes for acknowledged alerts")
    ),
    responses(
        (status = 200, description = "Alerts of the caller, newest first"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_alerts(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<AlertsQuery>,
) -> ApiResult<Json<Vec<AlertDto>>> {
    let alerts = alert_service::list_alerts(
        state.alert_repo.as_ref(),
        &auth.user,
        params.severity,
        params.acknowledged,
    )
    .await?;

    Ok(Json(alerts.into_iter().map(AlertDto::from).collect()))
}

pub async fn get_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<AlertDto>> {
    let alert = alert_service::get_alert(state.alert_repo.as_ref(), &auth.user, id).await?;
    Ok(Json(alert.into()))
}

#[utoipa::path(
    patch,
    path = "/api/alerts/{id}/acknowledge",
    params(("id" = i32, Path, description = "Alert id")),
    responses(
        (status = 200, description = "Alert acknowledged"),
        (status = 400, description = "Alert already acknowledged"),
        (status = 404, description = "No such alert for this user")
    )
)]
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<AlertDto>> {
    let alert = alert_service::acknowledge_alert(state.alert_repo.as_ref(), &auth.user, id).await?;
    Ok(Json(alert.into()))
}

#[utoipa::path(
    get,
    path = "/api/alerts/statistics",
    responses(
        (status = 200, description = "Alert counts and the most recent alerts")
    )
)]
pub async fn statistics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<StatisticsDto>> {
    let stats = alert_service::statistics(state.alert_repo.as_ref(), &auth.user).await?;
    Ok(Json(stats.into()))
}
