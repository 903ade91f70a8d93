//! Repository implementations using SeaORM

pub mod alert_repository;
pub mod reading_repository;
pub mod sensor_repository;
pub mod user_repository;

pub use alert_repository::SeaOrmAlertRepository;
pub use reading_repository::SeaOrmReadingRepository;
pub use sensor_repository::SeaOrmSensorRepository;
pub use user_repository::{SeaOrmSessionRepository, SeaOrmUserRepository};

use serde_json::Value;

use crate::domain::DomainError;

/// Parse a code column back into its enum, reporting corrupt rows as internal errors
pub(crate) fn parse_code<T>(raw: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr<Err = DomainError>,
{
    raw.parse()
        .map_err(|_| DomainError::Internal(format!("Unexpected stored code '{}'", raw)))
}

/// Decode a JSON text column, falling back to `{}` for legacy empty values
pub(crate) fn parse_json(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Stored JSON could not be decoded ({}), keeping raw text", e);
        Value::String(raw.to_string())
    })
}
