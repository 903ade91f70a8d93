use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;

use axum::{
    async_trait,
    extract::{FromRequestParts, Json},
    http::{request::Parts, StatusCode},
};
use serde_json::json;

use crate::domain::User;
use crate::infrastructure::config::jwt_expiry_hours;
use crate::infrastructure::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub jti: String, // session token id
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn get_jwt_secret() -> Result<String, String> {
    match env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => Ok(secret),
        _ if cfg!(debug_assertions) => Ok("secret".to_string()),
        _ => Err("JWT_SECRET environment variable must be set in production".to_string()),
    }
}

/// Issue a signed token for a user session identified by `token_id`
pub fn create_jwt(user_id: i32, username: &str, token_id: &str) -> Result<String, String> {
    let secret = get_jwt_secret()?;
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(jwt_expiry_hours()))
        .ok_or_else(|| "Token expiry overflows".to_string())?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_owned(),
        jti: token_id.to_owned(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

pub fn decode_jwt(token: &str) -> Result<Claims, String> {
    let secret = get_jwt_secret()?;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

/// The authenticated caller. Extracting it requires a valid bearer token whose
/// session has not been revoked.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

type Rejection = (StatusCode, Json<serde_json::Value>);

fn unauthorized(message: &str) -> Rejection {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message })))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Rejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization header format"))?;

        let claims = decode_jwt(token).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            unauthorized("Invalid or expired token")
        })?;
        let user_id = claims
            .user_id()
            .ok_or_else(|| unauthorized("Invalid or expired token"))?;

        let internal = |e: crate::domain::DomainError| {
            tracing::error!("Session lookup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
        };

        if !state
            .session_repo
            .is_active(user_id, &claims.jti)
            .await
            .map_err(internal)?
        {
            return Err(unauthorized("Invalid or expired token"));
        }

        let user = state
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| unauthorized("Invalid or expired token"))?;

        Ok(AuthUser { user })
    }
}
