use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use super::error::ApiResult;
use super::extract::{ApiJson};
use crate::domain::UpdateUserInput;
use crate::infrastructure::auth::AuthUser;
use crate::infrastructure::AppState;
use crate::services::auth_service::{self, LoginInput, RegisterInput};

/// Devices and keypads send PINs as JSON numbers as often as strings
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    username: String,
    email: Option<String>,
    password: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    auth_method: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pin: Option<String>,
    phone_number: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    password: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pin: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    responses(
        (status = 201, description = "User registered, token issued"),
        (status = 400, description = "Missing or malformed credentials"),
        (status = 409, description = "Username already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let session = auth_service::register(
        state.user_repo.as_ref(),
        state.session_repo.as_ref(),
        RegisterInput {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
            auth_method: payload.auth_method,
            pin: payload.pin,
            phone_number: payload.phone_number,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "token": session.token,
            "user": session.user,
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "Login successful, token issued"),
        (status = 400, description = "Required credential missing"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let session = auth_service::login(
        state.user_repo.as_ref(),
        state.session_repo.as_ref(),
        LoginInput {
            username: payload.username,
            password: payload.password,
            pin: payload.pin,
        },
    )
    .await?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": session.token,
        "user": session.user,
    })))
}

pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Value>> {
    auth_service::logout(state.session_repo.as_ref(), &auth.user).await?;
    Ok(Json(json!({ "message": "Logout successful" })))
}

pub async fn get_me(auth: AuthUser) -> Json<Value> {
    Json(json!(auth.user))
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone_number: Option<String>,
    notification_enabled: Option<bool>,
}

/// Blank strings clear optional profile fields
fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| Some(v.trim().to_string()).filter(|v| !v.is_empty()))
}

pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<Value>> {
    let user = auth_service::update_profile(
        state.user_repo.as_ref(),
        &auth.user,
        UpdateUserInput {
            email: clearable(payload.email),
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone_number: clearable(payload.phone_number),
            notification_enabled: payload.notification_enabled,
        },
    )
    .await?;

    Ok(Json(json!(user)))
}
