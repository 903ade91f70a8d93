//! Sensor Service - registration and maintenance of a user's sensors

use serde_json::Value;

use crate::domain::{
    DomainError, NewSensor, Sensor, SensorFilter, SensorRepository, SensorStatus, SensorType,
    UpdateSensorInput, User,
};

/// Sensor form as received from a client; codes are still raw strings
#[derive(Debug, Clone, Default)]
pub struct SensorInput {
    pub name: Option<String>,
    pub sensor_type: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub handler_class: Option<Option<String>>,
    pub connection_config: Option<Value>,
    pub metadata: Option<Value>,
}

fn required_text(value: Option<String>, field: &str) -> Result<String, DomainError> {
    optional_text(value, field)?.ok_or_else(|| DomainError::field(field, "This field is required."))
}

/// `None` when absent, an error when present but blank
fn optional_text(value: Option<String>, field: &str) -> Result<Option<String>, DomainError> {
    match value.map(|v| v.trim().to_string()) {
        None => Ok(None),
        Some(v) if v.is_empty() => Err(DomainError::field(field, "This field may not be blank.")),
        Some(v) => Ok(Some(v)),
    }
}

fn json_object(value: Option<Value>, field: &str) -> Result<Option<Value>, DomainError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Object(_)) => Ok(Some(v)),
        Some(_) => Err(DomainError::field(field, "Must be a JSON object.")),
    }
}

fn parse_filter_code<T>(raw: Option<String>) -> Result<Option<T>, DomainError>
where
    T: std::str::FromStr<Err = DomainError>,
{
    raw.filter(|r| !r.is_empty())
        .map(|r| r.to_ascii_uppercase().parse())
        .transpose()
}

pub async fn list_sensors(
    sensors: &dyn SensorRepository,
    owner: &User,
    sensor_type: Option<String>,
    status: Option<String>,
) -> Result<Vec<Sensor>, DomainError> {
    let filter = SensorFilter {
        sensor_type: parse_filter_code::<SensorType>(sensor_type)?,
        status: parse_filter_code::<SensorStatus>(status)?,
    };
    sensors.find_for_owner(owner.id, filter).await
}

pub async fn get_sensor(
    sensors: &dyn SensorRepository,
    owner: &User,
    id: i32,
) -> Result<Sensor, DomainError> {
    sensors
        .find_owned(id, owner.id)
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn create_sensor(
    sensors: &dyn SensorRepository,
    owner: &User,
    input: SensorInput,
) -> Result<Sensor, DomainError> {
    let name = required_text(input.name, "name")?;
    let sensor_type: SensorType = required_text(input.sensor_type, "sensor_type")?.parse()?;
    let location = required_text(input.location, "location")?;
    let status = match optional_text(input.status, "status")? {
        Some(raw) => raw.parse()?,
        None => SensorStatus::default(),
    };

    sensors
        .create(NewSensor {
            name,
            sensor_type,
            location,
            status,
            handler_class: input.handler_class.flatten().filter(|c| !c.trim().is_empty()),
            connection_config: json_object(input.connection_config, "connection_config")?
                .unwrap_or_else(|| Value::Object(Default::default())),
            metadata: json_object(input.metadata, "metadata")?
                .unwrap_or_else(|| Value::Object(Default::default())),
            owner_id: owner.id,
        })
        .await
}

/// Partial update: only fields present in `input` change
pub async fn update_sensor(
    sensors: &dyn SensorRepository,
    owner: &User,
    id: i32,
    input: SensorInput,
) -> Result<Sensor, DomainError> {
    let update = UpdateSensorInput {
        name: optional_text(input.name, "name")?,
        sensor_type: optional_text(input.sensor_type, "sensor_type")?
            .map(|raw| raw.parse())
            .transpose()?,
        location: optional_text(input.location, "location")?,
        status: optional_text(input.status, "status")?
            .map(|raw| raw.parse())
            .transpose()?,
        handler_class: input
            .handler_class
            .map(|c| c.filter(|c| !c.trim().is_empty())),
        connection_config: json_object(input.connection_config, "connection_config")?,
        metadata: json_object(input.metadata, "metadata")?,
    };

    sensors.update(id, owner.id, update).await
}

pub async fn delete_sensor(
    sensors: &dyn SensorRepository,
    owner: &User,
    id: i32,
) -> Result<(), DomainError> {
    sensors.delete(id, owner.id).await
}
