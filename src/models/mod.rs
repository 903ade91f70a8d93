pub mod alert;
pub mod sensor;
pub mod sensor_reading;
pub mod session;
pub mod user;
