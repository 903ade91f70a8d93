//! Vocabulary enums shared by every layer
//!
//! Each enum is stored and transmitted as its code (`DOOR_CONTACT`, `pin`, ...)
//! and carries a human readable display name for API responses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => ($code:literal, $display:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            pub fn display_name(&self) -> &'static str {
                match self {
                    $($name::$variant => $display,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($name::$variant),)+
                    other => Err(DomainError::field(
                        $field,
                        format!("\"{}\" is not a valid choice", other),
                    )),
                }
            }
        }
    };
}

coded_enum! {
    /// How a user proves their identity at login
    AuthMethod, "auth_method" {
        Username => ("username", "Username Only"),
        Pin => ("pin", "PIN"),
        Password => ("password", "Password"),
    }
}

impl Default for AuthMethod {
    fn default() -> Self {
        AuthMethod::Password
    }
}

coded_enum! {
    SensorType, "sensor_type" {
        Camera => ("CAMERA", "Camera"),
        DoorContact => ("DOOR_CONTACT", "Door Contact"),
        WindowContact => ("WINDOW_CONTACT", "Window Contact"),
        GlassBreak => ("GLASS_BREAK", "Glass Break Sensor"),
        Motion => ("MOTION", "Motion Detector"),
        Smoke => ("SMOKE", "Smoke Detector"),
        Co => ("CO", "Carbon Monoxide Detector"),
        WaterLeak => ("WATER_LEAK", "Water Leak Sensor"),
        Temperature => ("TEMPERATURE", "Temperature Sensor"),
        Custom => ("CUSTOM", "Custom Sensor"),
    }
}

coded_enum! {
    SensorStatus, "status" {
        Active => ("ACTIVE", "Active"),
        Inactive => ("INACTIVE", "Inactive"),
        Maintenance => ("MAINTENANCE", "Maintenance"),
        Error => ("ERROR", "Error"),
    }
}

impl Default for SensorStatus {
    fn default() -> Self {
        SensorStatus::Active
    }
}

coded_enum! {
    AlertType, "alert_type" {
        Intrusion => ("INTRUSION", "Intrusion Detected"),
        Motion => ("MOTION", "Motion Detected"),
        DoorOpen => ("DOOR_OPEN", "Door Opened"),
        WindowOpen => ("WINDOW_OPEN", "Window Opened"),
        GlassBreak => ("GLASS_BREAK", "Glass Break Detected"),
        Smoke => ("SMOKE", "Smoke Detected"),
        Co => ("CO", "Carbon Monoxide Detected"),
        WaterLeak => ("WATER_LEAK", "Water Leak Detected"),
        Temperature => ("TEMPERATURE", "Temperature Anomaly"),
        System => ("SYSTEM", "System Alert"),
        Custom => ("CUSTOM", "Custom Alert"),
    }
}

coded_enum! {
    /// Ordered from least to most urgent
    Severity, "severity" {
        Info => ("INFO", "Informational"),
        Low => ("LOW", "Low"),
        Medium => ("MEDIUM", "Medium"),
        High => ("HIGH", "High"),
        Critical => ("CRITICAL", "Critical"),
    }
}
