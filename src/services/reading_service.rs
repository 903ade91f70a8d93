//! Reading Service - the reading -> threat detection -> alert pipeline

use serde_json::Value;

use crate::detection;
use crate::domain::{
    DomainError, IngestedReading, NewReading, ReadingFilter, ReadingRepository, SensorReading,
    SensorRepository, User,
};

/// Readings returned by a sensor's history endpoint
pub const HISTORY_LIMIT: u64 = 100;
pub const DEFAULT_LIST_LIMIT: u64 = 100;
pub const MAX_LIST_LIMIT: u64 = 500;

#[derive(Debug, Clone)]
pub struct SubmitReading {
    pub value: Value,
    pub reading_type: Option<String>,
}

/// Validate, normalize and store a reading from one of `owner`'s sensors,
/// raising whatever alerts its handler detects.
pub async fn submit_reading(
    sensors: &dyn SensorRepository,
    readings: &dyn ReadingRepository,
    owner: &User,
    sensor_id: i32,
    input: SubmitReading,
) -> Result<IngestedReading, DomainError> {
    let sensor = sensors
        .find_owned(sensor_id, owner.id)
        .await?
        .ok_or(DomainError::NotFound)?;

    let handler = detection::resolve(&sensor);

    let value = match handler {
        Some(handler) => {
            handler
                .validate_reading(&input.value)
                .map_err(|message| DomainError::field("value", message))?;
            handler.process_reading(&input.value)
        }
        None => {
            tracing::debug!(
                "No handler for sensor {} ({}), storing raw reading",
                sensor.id,
                sensor.sensor_type
            );
            input.value
        }
    };

    let detect = |reading: &SensorReading| {
        handler
            .map(|h| h.detect_threats(&sensor, reading))
            .unwrap_or_default()
    };

    let ingested = readings
        .ingest(
            &sensor,
            NewReading {
                sensor_id: sensor.id,
                value,
                reading_type: input.reading_type.filter(|t| !t.trim().is_empty()),
            },
            &detect,
        )
        .await?;

    tracing::debug!(
        "Reading {} from sensor {} processed, {} alert(s)",
        ingested.reading.id,
        sensor.id,
        ingested.alerts.len()
    );

    Ok(ingested)
}

pub async fn reading_history(
    sensors: &dyn SensorRepository,
    readings: &dyn ReadingRepository,
    owner: &User,
    sensor_id: i32,
) -> Result<Vec<SensorReading>, DomainError> {
    let sensor = sensors
        .find_owned(sensor_id, owner.id)
        .await?
        .ok_or(DomainError::NotFound)?;
    readings.history(&sensor, HISTORY_LIMIT).await
}

pub async fn list_readings(
    readings: &dyn ReadingRepository,
    owner: &User,
    sensor_id: Option<i32>,
    processed: Option<bool>,
    limit: Option<u64>,
) -> Result<Vec<SensorReading>, DomainError> {
    readings
        .find_for_owner(ReadingFilter {
            owner_id: owner.id,
            sensor_id,
            processed,
            limit: limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT),
        })
        .await
}

pub async fn get_reading(
    readings: &dyn ReadingRepository,
    owner: &User,
    id: i32,
) -> Result<SensorReading, DomainError> {
    readings
        .find_owned(id, owner.id)
        .await?
        .ok_or(DomainError::NotFound)
}
