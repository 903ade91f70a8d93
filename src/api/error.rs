//! Mapping of domain errors and extractor rejections onto HTTP responses

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::DomainError;

#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// The request could not be decoded by an extractor
    Rejected { status: StatusCode, message: String },
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::Domain(e)
    }
}

macro_rules! from_rejection {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    ApiError::Rejected {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    }
                }
            }
        )+
    };
}

from_rejection!(JsonRejection, PathRejection, QueryRejection);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match self {
            ApiError::Domain(error) => error,
            ApiError::Rejected { status, message } => {
                tracing::debug!("Rejected request ({}): {}", status, message);
                return (status, Json(json!({ "error": message }))).into_response();
            }
        };

        let (status, body) = match error {
            DomainError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Not found" })),
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            DomainError::InvalidField { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "field": field }),
            ),
            DomainError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            DomainError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            DomainError::Database(msg) | DomainError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
