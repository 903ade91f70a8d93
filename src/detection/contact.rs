//! Door and window contact sensors: open/closed states and intrusion alerts.

use serde_json::{json, Value};

use super::{field_or_null, SensorHandler};
use crate::domain::{AlertDraft, AlertType, Sensor, SensorReading, SensorType, Severity};

pub struct ContactHandler;

impl SensorHandler for ContactHandler {
    fn name(&self) -> &'static str {
        "ContactHandler"
    }

    fn validate_reading(&self, data: &Value) -> Result<(), String> {
        let object = data
            .as_object()
            .ok_or_else(|| "Data must be a dictionary".to_string())?;

        let state = object
            .get("state")
            .ok_or_else(|| "Missing 'state' field".to_string())?;

        match state.as_str() {
            Some("open") | Some("closed") => Ok(()),
            _ => Err("State must be 'open' or 'closed'".to_string()),
        }
    }

    fn process_reading(&self, data: &Value) -> Value {
        json!({
            "state": field_or_null(data, "state"),
            "timestamp": field_or_null(data, "timestamp"),
            "sensor_battery": field_or_null(data, "battery_level"),
        })
    }

    fn detect_threats(&self, sensor: &Sensor, reading: &SensorReading) -> Vec<AlertDraft> {
        if reading.value.get("state").and_then(Value::as_str) != Some("open") {
            return Vec::new();
        }

        let alert_type = if sensor.sensor_type == SensorType::DoorContact {
            AlertType::DoorOpen
        } else {
            AlertType::WindowOpen
        };

        vec![AlertDraft {
            alert_type,
            severity: Severity::Medium,
            title: format!("{} Opened", sensor.name),
            description: format!(
                "The {} {} was opened.",
                sensor.location,
                sensor.sensor_type.display_name().to_lowercase()
            ),
            metadata: json!({
                "reading_id": reading.id,
                "timestamp": reading.timestamp,
            }),
        }]
    }
}
