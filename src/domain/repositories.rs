//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::{AlertType, AuthMethod, DomainError, SensorStatus, SensorType, Severity};

/// Public view of an account. Credential material never leaves the repository
/// except through [`UserCredentials`].
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub auth_method: AuthMethod,
    pub phone_number: Option<String>,
    pub notification_enabled: bool,
    pub date_joined: String,
}

/// A user together with the hashes needed to check a login attempt
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: Option<String>,
    pub pin_hash: Option<String>,
}

/// Input for creating a user (secrets already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub auth_method: AuthMethod,
    pub password_hash: Option<String>,
    pub pin_hash: Option<String>,
    pub phone_number: Option<String>,
}

/// Input for updating a profile; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub email: Option<Option<String>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<Option<String>>,
    pub notification_enabled: Option<bool>,
}

/// Repository trait for User entity
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;

    /// Look up a user and their stored credential hashes by username
    async fn find_credentials(&self, username: &str)
        -> Result<Option<UserCredentials>, DomainError>;

    /// Create a user. Fails with `Conflict` when the username is taken.
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    async fn update(&self, id: i32, input: UpdateUserInput) -> Result<User, DomainError>;
}

/// Repository trait for issued login sessions (one row per token id)
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, user_id: i32, token_id: &str) -> Result<(), DomainError>;

    async fn is_active(&self, user_id: i32, token_id: &str) -> Result<bool, DomainError>;

    /// Revoke every session of a user, returning how many were removed
    async fn revoke_all(&self, user_id: i32) -> Result<u64, DomainError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct Sensor {
    pub id: i32,
    pub name: String,
    pub sensor_type: SensorType,
    pub location: String,
    pub status: SensorStatus,
    pub handler_class: Option<String>,
    pub connection_config: Value,
    pub metadata: Value,
    #[serde(rename = "owner")]
    pub owner_id: i32,
    pub owner_username: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Filter criteria for sensor queries
#[derive(Debug, Default, Clone)]
pub struct SensorFilter {
    pub sensor_type: Option<SensorType>,
    pub status: Option<SensorStatus>,
}

#[derive(Debug, Clone)]
pub struct NewSensor {
    pub name: String,
    pub sensor_type: SensorType,
    pub location: String,
    pub status: SensorStatus,
    pub handler_class: Option<String>,
    pub connection_config: Value,
    pub metadata: Value,
    pub owner_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSensorInput {
    pub name: Option<String>,
    pub sensor_type: Option<SensorType>,
    pub location: Option<String>,
    pub status: Option<SensorStatus>,
    pub handler_class: Option<Option<String>>,
    pub connection_config: Option<Value>,
    pub metadata: Option<Value>,
}

/// Repository trait for Sensor entity. Every lookup is scoped to an owner.
#[async_trait]
pub trait SensorRepository: Send + Sync {
    /// Sensors owned by `owner_id`, newest first
    async fn find_for_owner(
        &self,
        owner_id: i32,
        filter: SensorFilter,
    ) -> Result<Vec<Sensor>, DomainError>;

    async fn find_owned(&self, id: i32, owner_id: i32) -> Result<Option<Sensor>, DomainError>;

    async fn create(&self, sensor: NewSensor) -> Result<Sensor, DomainError>;

    async fn update(
        &self,
        id: i32,
        owner_id: i32,
        input: UpdateSensorInput,
    ) -> Result<Sensor, DomainError>;

    /// Delete a sensor with its readings and alerts
    async fn delete(&self, id: i32, owner_id: i32) -> Result<(), DomainError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct SensorReading {
    pub id: i32,
    #[serde(rename = "sensor")]
    pub sensor_id: i32,
    pub sensor_name: String,
    pub timestamp: String,
    pub value: Value,
    pub reading_type: Option<String>,
    pub processed: bool,
}

#[derive(Debug, Clone)]
pub struct NewReading {
    pub sensor_id: i32,
    pub value: Value,
    pub reading_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReadingFilter {
    pub owner_id: i32,
    pub sensor_id: Option<i32>,
    pub processed: Option<bool>,
    pub limit: u64,
}

/// An alert derived from a reading, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub metadata: Value,
}

/// Threat detection callback run against a freshly stored reading
pub type ThreatDetector<'a> = &'a (dyn Fn(&SensorReading) -> Vec<AlertDraft> + Send + Sync);

/// Outcome of storing a reading: the processed reading and the alerts it raised
#[derive(Debug, Clone)]
pub struct IngestedReading {
    pub reading: SensorReading,
    pub alerts: Vec<Alert>,
}

/// Repository trait for SensorReading entity
#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Store a reading, raise the alerts `detect` derives from it for the
    /// sensor's owner, and mark it processed. All or nothing.
    async fn ingest(
        &self,
        sensor: &Sensor,
        reading: NewReading,
        detect: ThreatDetector<'_>,
    ) -> Result<IngestedReading, DomainError>;

    /// Most recent readings of one sensor
    async fn history(&self, sensor: &Sensor, limit: u64)
        -> Result<Vec<SensorReading>, DomainError>;

    async fn find_for_owner(&self, filter: ReadingFilter)
        -> Result<Vec<SensorReading>, DomainError>;

    async fn find_owned(&self, id: i32, owner_id: i32)
        -> Result<Option<SensorReading>, DomainError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: i32,
    pub alert_type: AlertType,
    pub severity: Severity,
    #[serde(rename = "sensor")]
    pub sensor_id: Option<i32>,
    pub sensor_name: Option<String>,
    #[serde(rename = "user")]
    pub user_id: i32,
    pub timestamp: String,
    pub title: String,
    pub description: String,
    pub acknowledged: bool,
    pub acknowledged_at: Option<String>,
    pub acknowledged_by: Option<i32>,
    pub acknowledged_by_username: Option<String>,
    pub metadata: Value,
}

/// Filter criteria for alert queries
#[derive(Debug, Clone)]
pub struct AlertFilter {
    pub user_id: i32,
    pub severity: Option<Severity>,
    pub acknowledged: Option<bool>,
    pub limit: Option<u64>,
}

impl AlertFilter {
    pub fn for_user(user_id: i32) -> Self {
        Self {
            user_id,
            severity: None,
            acknowledged: None,
            limit: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertStatistics {
    pub total_alerts: u64,
    pub unacknowledged_alerts: u64,
    pub by_severity: BTreeMap<String, u64>,
    pub recent_alerts: Vec<Alert>,
}

/// Repository trait for Alert entity
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Alerts of a user matching the filter, newest first
    async fn find_for_user(&self, filter: AlertFilter) -> Result<Vec<Alert>, DomainError>;

    async fn find_owned(&self, id: i32, user_id: i32) -> Result<Option<Alert>, DomainError>;

    /// Mark an alert acknowledged by `user_id`.
    /// Fails with `Validation` when it already is.
    async fn acknowledge(&self, id: i32, user_id: i32) -> Result<Alert, DomainError>;

    async fn statistics(&self, user_id: i32, recent: u64)
        -> Result<AlertStatistics, DomainError>;
}
