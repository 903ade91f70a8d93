//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers.
//! Services work against the repository traits so they can be driven by the
//! Axum handlers or directly.

pub mod alert_service;
pub mod auth_service;
pub mod reading_service;
pub mod sensor_service;
