//! Camera sensors. Only the motion flag reported by the device is used for
//! now; image analysis is not performed.

use serde_json::{json, Value};

use super::{field_or_null, is_truthy, SensorHandler};
use crate::domain::{AlertDraft, AlertType, Sensor, SensorReading, Severity};

pub struct CameraHandler;

impl SensorHandler for CameraHandler {
    fn name(&self) -> &'static str {
        "CameraHandler"
    }

    fn validate_reading(&self, data: &Value) -> Result<(), String> {
        let object = data
            .as_object()
            .ok_or_else(|| "Data must be a dictionary".to_string())?;

        if !object.contains_key("image_url") && !object.contains_key("motion_detected") {
            return Err("Must include 'image_url' or 'motion_detected'".to_string());
        }

        Ok(())
    }

    fn process_reading(&self, data: &Value) -> Value {
        json!({
            "image_url": field_or_null(data, "image_url"),
            "motion_detected": data.get("motion_detected").cloned().unwrap_or(Value::Bool(false)),
            "timestamp": field_or_null(data, "timestamp"),
            "metadata": data.get("metadata").cloned().unwrap_or_else(|| json!({})),
        })
    }

    fn detect_threats(&self, sensor: &Sensor, reading: &SensorReading) -> Vec<AlertDraft> {
        if !is_truthy(reading.value.get("motion_detected")) {
            return Vec::new();
        }

        vec![AlertDraft {
            alert_type: AlertType::Motion,
            severity: Severity::Low,
            title: format!("Motion Detected at {}", sensor.name),
            description: format!("Motion was detected by camera at {}.", sensor.location),
            metadata: json!({
                "reading_id": reading.id,
                "image_url": field_or_null(&reading.value, "image_url"),
                "timestamp": reading.timestamp,
            }),
        }]
    }
}
