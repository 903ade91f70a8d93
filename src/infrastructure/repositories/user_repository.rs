//! SeaORM implementations of UserRepository and SessionRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, SqlErr,
};

use super::parse_code;
use crate::domain::{
    DomainError, NewUser, SessionRepository, UpdateUserInput, User, UserCredentials,
    UserRepository,
};
use crate::infrastructure::db::now_timestamp;
use crate::models::session::{self, Entity as SessionEntity};
use crate::models::user::{self, Entity as UserEntity};

fn to_domain(model: user::Model) -> Result<User, DomainError> {
    Ok(User {
        id: model.id,
        auth_method: parse_code(&model.auth_method)?,
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        phone_number: model.phone_number,
        notification_enabled: model.notification_enabled,
        date_joined: model.created_at,
    })
}

/// SeaORM-based implementation of UserRepository
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let Some(model) = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let password_hash = model.password_hash.clone();
        let pin_hash = model.pin_hash.clone();
        Ok(Some(UserCredentials {
            user: to_domain(model)?,
            password_hash,
            pin_hash,
        }))
    }

    async fn create(&self, input: NewUser) -> Result<User, DomainError> {
        let taken = UserEntity::find()
            .filter(user::Column::Username.eq(input.username.as_str()))
            .count(&self.db)
            .await?;
        if taken > 0 {
            return Err(DomainError::Conflict(
                "Username is already registered".to_string(),
            ));
        }

        let now = now_timestamp();
        let model = user::ActiveModel {
            username: Set(input.username),
            email: Set(input.email),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            auth_method: Set(input.auth_method.as_str().to_string()),
            password_hash: Set(input.password_hash),
            pin_hash: Set(input.pin_hash),
            phone_number: Set(input.phone_number),
            notification_enabled: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(saved) => to_domain(saved),
            // Lost a race with a concurrent registration
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
                DomainError::Conflict("Username is already registered".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, id: i32, input: UpdateUserInput) -> Result<User, DomainError> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: user::ActiveModel = existing.into();
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(first_name) = input.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone_number) = input.phone_number {
            active.phone_number = Set(phone_number);
        }
        if let Some(enabled) = input.notification_enabled {
            active.notification_enabled = Set(enabled);
        }
        active.updated_at = Set(now_timestamp());

        to_domain(active.update(&self.db).await?)
    }
}

/// SeaORM-based implementation of SessionRepository
pub struct SeaOrmSessionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for SeaOrmSessionRepository {
    async fn create(&self, user_id: i32, token_id: &str) -> Result<(), DomainError> {
        let model = session::ActiveModel {
            user_id: Set(user_id),
            token_id: Set(token_id.to_string()),
            created_at: Set(now_timestamp()),
            ..Default::default()
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn is_active(&self, user_id: i32, token_id: &str) -> Result<bool, DomainError> {
        let count = SessionEntity::find()
            .filter(session::Column::UserId.eq(user_id))
            .filter(session::Column::TokenId.eq(token_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn revoke_all(&self, user_id: i32) -> Result<u64, DomainError> {
        let result = SessionEntity::delete_many()
            .filter(session::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
