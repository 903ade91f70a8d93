//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{
    AlertRepository, ReadingRepository, SensorRepository, SessionRepository, UserRepository,
};
use crate::infrastructure::{
    SeaOrmAlertRepository, SeaOrmReadingRepository, SeaOrmSensorRepository,
    SeaOrmSessionRepository, SeaOrmUserRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<dyn UserRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub sensor_repo: Arc<dyn SensorRepository>,
    pub reading_repo: Arc<dyn ReadingRepository>,
    pub alert_repo: Arc<dyn AlertRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(SeaOrmUserRepository::new(db.clone())),
            session_repo: Arc::new(SeaOrmSessionRepository::new(db.clone())),
            sensor_repo: Arc::new(SeaOrmSensorRepository::new(db.clone())),
            reading_repo: Arc::new(SeaOrmReadingRepository::new(db.clone())),
            alert_repo: Arc::new(SeaOrmAlertRepository::new(db)),
        }
    }
}
