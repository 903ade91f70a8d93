//! Auth Service - registration, login and logout without the HTTP layer

use uuid::Uuid;

use crate::domain::{
    AuthMethod, DomainError, NewUser, SessionRepository, UpdateUserInput, User, UserRepository,
};
use crate::infrastructure::auth::{create_jwt, hash_password, verify_password};

pub const PIN_LENGTH: usize = 4;

/// Registration form as received from a client
#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub username: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub auth_method: Option<String>,
    pub pin: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    pub username: String,
    pub password: Option<String>,
    pub pin: Option<String>,
}

/// A user with a freshly issued session token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn internal(e: String) -> DomainError {
    DomainError::Internal(e)
}

pub fn validate_pin(pin: &str) -> Result<(), DomainError> {
    if pin.len() != PIN_LENGTH || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::field("pin", "PIN must be exactly 4 digits"));
    }
    Ok(())
}

/// Open a new session for `user` and sign a token for it
pub async fn issue_session(
    sessions: &dyn SessionRepository,
    user: User,
) -> Result<AuthSession, DomainError> {
    let token_id = Uuid::new_v4().to_string();
    sessions.create(user.id, &token_id).await?;
    let token = create_jwt(user.id, &user.username, &token_id).map_err(internal)?;
    Ok(AuthSession { token, user })
}

pub async fn register(
    users: &dyn UserRepository,
    sessions: &dyn SessionRepository,
    input: RegisterInput,
) -> Result<AuthSession, DomainError> {
    let username = input.username.trim().to_string();
    if username.is_empty() {
        return Err(DomainError::field("username", "Username is required"));
    }

    let auth_method = match non_empty(input.auth_method) {
        Some(raw) => raw.parse::<AuthMethod>()?,
        None => AuthMethod::default(),
    };

    let password = non_empty(input.password);
    let pin = non_empty(input.pin);

    // Only the secret the chosen method uses is kept
    let (password_hash, pin_hash) = match auth_method {
        AuthMethod::Password => {
            let password = password.ok_or_else(|| {
                DomainError::field("password", "Password is required for password authentication")
            })?;
            (Some(hash_password(&password).map_err(internal)?), None)
        }
        AuthMethod::Pin => {
            let pin = pin.ok_or_else(|| {
                DomainError::field("pin", "PIN is required for PIN authentication")
            })?;
            validate_pin(&pin)?;
            (None, Some(hash_password(&pin).map_err(internal)?))
        }
        AuthMethod::Username => (None, None),
    };

    let user = users
        .create(NewUser {
            username,
            email: non_empty(input.email),
            first_name: input.first_name.unwrap_or_default(),
            last_name: input.last_name.unwrap_or_default(),
            auth_method,
            password_hash,
            pin_hash,
            phone_number: non_empty(input.phone_number),
        })
        .await?;

    tracing::info!(
        "Registered user {} ({}) with {} authentication",
        user.username,
        user.id,
        auth_method
    );

    issue_session(sessions, user).await
}

fn check_secret(
    supplied: Option<String>,
    stored: Option<&str>,
    field: &str,
    missing: &str,
) -> Result<(), DomainError> {
    let supplied = non_empty(supplied).ok_or_else(|| DomainError::field(field, missing))?;
    let stored = stored.ok_or_else(|| DomainError::Unauthorized("Invalid credentials".to_string()))?;

    if verify_password(&supplied, stored).map_err(internal)? {
        Ok(())
    } else {
        Err(DomainError::Unauthorized("Invalid credentials".to_string()))
    }
}

pub async fn login(
    users: &dyn UserRepository,
    sessions: &dyn SessionRepository,
    input: LoginInput,
) -> Result<AuthSession, DomainError> {
    let username = input.username.trim();
    if username.is_empty() {
        return Err(DomainError::field("username", "Username is required"));
    }

    tracing::info!("Login attempt for user: {}", username);

    let Some(credentials) = users.find_credentials(username).await? else {
        tracing::warn!("User not found: {}", username);
        return Err(DomainError::Unauthorized("Invalid credentials".to_string()));
    };

    let outcome = match credentials.user.auth_method {
        AuthMethod::Username => Ok(()),
        AuthMethod::Pin => check_secret(
            input.pin,
            credentials.pin_hash.as_deref(),
            "pin",
            "PIN is required",
        ),
        AuthMethod::Password => check_secret(
            input.password,
            credentials.password_hash.as_deref(),
            "password",
            "Password is required",
        ),
    };

    if let Err(e) = outcome {
        tracing::warn!("Login rejected for user {}: {}", username, e);
        return Err(e);
    }

    tracing::info!("User {} logged in", credentials.user.username);
    issue_session(sessions, credentials.user).await
}

/// Revoke every session of the user
pub async fn logout(sessions: &dyn SessionRepository, user: &User) -> Result<(), DomainError> {
    let revoked = sessions.revoke_all(user.id).await?;
    tracing::info!("User {} logged out ({} sessions revoked)", user.username, revoked);
    Ok(())
}

pub async fn update_profile(
    users: &dyn UserRepository,
    user: &User,
    input: UpdateUserInput,
) -> Result<User, DomainError> {
    users.update(user.id, input).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_must_be_four_digits() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("0000").is_ok());
        for bad in ["123", "12345", "12a4", "١٢٣٤", ""] {
            assert_eq!(
                validate_pin(bad).unwrap_err(),
                DomainError::field("pin", "PIN must be exactly 4 digits"),
                "{bad:?} should be rejected"
            );
        }
    }
}
