//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only vocabulary types, trait definitions and domain error types.

pub mod errors;
pub mod repositories;
pub mod types;

pub use errors::DomainError;
pub use repositories::*;
pub use types::*;
