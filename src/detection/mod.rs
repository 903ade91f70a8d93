//! Sensor handlers
//!
//! A handler knows how to validate and normalize the raw readings of one kind
//! of sensor and which threats those readings imply. Sensors without a handler
//! have their readings stored as-is.

mod camera;
mod contact;

pub use camera::CameraHandler;
pub use contact::ContactHandler;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{AlertDraft, Sensor, SensorReading, SensorType};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HandlerInfo {
    pub handler_class: &'static str,
    pub sensor_type: SensorType,
    pub sensor_name: String,
}

pub trait SensorHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Check raw reading data, returning a message describing the first problem
    fn validate_reading(&self, data: &Value) -> Result<(), String>;

    /// Normalize validated data into the value that gets stored
    fn process_reading(&self, data: &Value) -> Value;

    fn detect_threats(&self, _sensor: &Sensor, _reading: &SensorReading) -> Vec<AlertDraft> {
        Vec::new()
    }

    fn handler_info(&self, sensor: &Sensor) -> HandlerInfo {
        HandlerInfo {
            handler_class: self.name(),
            sensor_type: sensor.sensor_type,
            sensor_name: sensor.name.clone(),
        }
    }
}

static CONTACT: ContactHandler = ContactHandler;
static CAMERA: CameraHandler = CameraHandler;

/// Handler for a sensor type, if that type has one
pub fn handler_for_type(sensor_type: SensorType) -> Option<&'static dyn SensorHandler> {
    match sensor_type {
        SensorType::DoorContact | SensorType::WindowContact => Some(&CONTACT),
        SensorType::Camera => Some(&CAMERA),
        _ => None,
    }
}

/// Handler by name. Accepts `ContactHandler`, `contact`, `CAMERA`, ...
pub fn handler_by_name(name: &str) -> Option<&'static dyn SensorHandler> {
    let name = name.trim().to_ascii_lowercase();
    let name = name.strip_suffix("handler").unwrap_or(&name);
    match name {
        "contact" => Some(&CONTACT),
        "camera" => Some(&CAMERA),
        _ => None,
    }
}

/// Resolve the handler for a sensor. An explicit `handler_class` wins over
/// the sensor type.
pub fn resolve(sensor: &Sensor) -> Option<&'static dyn SensorHandler> {
    if let Some(class) = sensor.handler_class.as_deref().filter(|c| !c.trim().is_empty()) {
        match handler_by_name(class) {
            Some(handler) => return Some(handler),
            None => tracing::warn!(
                "Sensor {} names unknown handler '{}', falling back to {}",
                sensor.id,
                class,
                sensor.sensor_type
            ),
        }
    }
    handler_for_type(sensor.sensor_type)
}

/// Loose truthiness for JSON flags sent by devices (`true`, `1`, `"yes"` ...)
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Copy a field from raw data, `null` when missing
pub(crate) fn field_or_null(data: &Value, key: &str) -> Value {
    data.get(key).cloned().unwrap_or(Value::Null)
}


#[cfg(test)]
mod tests {
    use super::test_support::sensor;
    use super::*;
    use serde_json::json;

    #[test]
    fn contact_types_share_a_handler() {
        assert_eq!(handler_for_type(SensorType::DoorContact).unwrap().name(), "ContactHandler");
        assert_eq!(handler_for_type(SensorType::WindowContact).unwrap().name(), "ContactHandler");
        assert_eq!(handler_for_type(SensorType::Camera).unwrap().name(), "CameraHandler");
        assert!(handler_for_type(SensorType::Smoke).is_none());
    }

    #[test]
    fn handler_class_overrides_sensor_type() {
        let mut s = sensor(SensorType::Custom, "Shed", "garden");
        assert!(resolve(&s).is_none());

        s.handler_class = Some("CameraHandler".to_string());
        assert_eq!(resolve(&s).unwrap().name(), "CameraHandler");

        s.handler_class = Some("contact".to_string());
        assert_eq!(resolve(&s).unwrap().name(), "ContactHandler");
    }

    #[test]
    fn unknown_handler_class_falls_back_to_type() {
        let mut s = sensor(SensorType::Camera, "Porch", "porch");
        s.handler_class = Some("sensors.handlers.Laser".to_string());
        assert_eq!(resolve(&s).unwrap().name(), "CameraHandler");
    }

    #[test]
    fn handler_info_describes_sensor() {
        let s = sensor(SensorType::DoorContact, "Front Door", "hallway");
        let info = resolve(&s).unwrap().handler_info(&s);
        assert_eq!(info.handler_class, "ContactHandler");
        assert_eq!(info.sensor_type, SensorType::DoorContact);
        assert_eq!(info.sensor_name, "Front Door");
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!("yes"))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&Value::Null)));
        assert!(!is_truthy(None));
    }
}
