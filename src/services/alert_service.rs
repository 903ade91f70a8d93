//! Alert Service - querying and acknowledging alerts

use crate::domain::{Alert, AlertFilter, AlertRepository, AlertStatistics, DomainError, Severity, User};

/// Alerts included in the statistics summary
pub const RECENT_ALERTS: u64 = 10;

/// `true`, `1` and `yes` (any case) mean true, anything else false
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

pub async fn list_alerts(
    alerts: &dyn AlertRepository,
    user: &User,
    severity: Option<String>,
    acknowledged: Option<String>,
) -> Result<Vec<Alert>, DomainError> {
    let severity = match severity.filter(|s| !s.is_empty()) {
        Some(raw) => match raw.to_ascii_uppercase().parse::<Severity>() {
            Ok(severity) => Some(severity),
            // No alert can carry an unknown severity
            Err(_) => return Ok(Vec::new()),
        },
        None => None,
    };

    alerts
        .find_for_user(AlertFilter {
            severity,
            acknowledged: acknowledged.as_deref().map(parse_flag),
            ..AlertFilter::for_user(user.id)
        })
        .await
}

pub async fn get_alert(
    alerts: &dyn AlertRepository,
    user: &User,
    id: i32,
) -> Result<Alert, DomainError> {
    alerts
        .find_owned(id, user.id)
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn acknowledge_alert(
    alerts: &dyn AlertRepository,
    user: &User,
    id: i32,
) -> Result<Alert, DomainError> {
    alerts.acknowledge(id, user.id).await
}

pub async fn statistics(
    alerts: &dyn AlertRepository,
    user: &User,
) -> Result<AlertStatistics, DomainError> {
    alerts.statistics(user.id, RECENT_ALERTS).await
}
