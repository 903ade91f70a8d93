//! SeaORM implementation of SensorRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{parse_code, parse_json};
use crate::domain::{
    DomainError, NewSensor, Sensor, SensorFilter, SensorRepository, UpdateSensorInput,
};
use crate::infrastructure::db::now_timestamp;
use crate::models::sensor::{self, Entity as SensorEntity};
use crate::models::user::Entity as UserEntity;

pub(crate) fn to_domain(model: sensor::Model, owner_username: String) -> Result<Sensor, DomainError> {
    Ok(Sensor {
        id: model.id,
        sensor_type: parse_code(&model.sensor_type)?,
        status: parse_code(&model.status)?,
        connection_config: parse_json(&model.connection_config),
        metadata: parse_json(&model.metadata),
        name: model.name,
        location: model.location,
        handler_class: model.handler_class,
        owner_id: model.owner_id,
        owner_username,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// SeaORM-based implementation of SensorRepository
pub struct SeaOrmSensorRepository {
    db: DatabaseConnection,
}

impl SeaOrmSensorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn owner_username(&self, owner_id: i32) -> Result<String, DomainError> {
        Ok(UserEntity::find_by_id(owner_id)
            .one(&self.db)
            .await?
            .map(|u| u.username)
            .unwrap_or_default())
    }

    async fn find_model(&self, id: i32, owner_id: i32) -> Result<sensor::Model, DomainError> {
        SensorEntity::find_by_id(id)
            .filter(sensor::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)
    }
}

#[async_trait]
impl SensorRepository for SeaOrmSensorRepository {
    async fn find_for_owner(
        &self,
        owner_id: i32,
        filter: SensorFilter,
    ) -> Result<Vec<Sensor>, DomainError> {
        let mut condition = Condition::all().add(sensor::Column::OwnerId.eq(owner_id));

        if let Some(sensor_type) = filter.sensor_type {
            condition = condition.add(sensor::Column::SensorType.eq(sensor_type.as_str()));
        }

        if let Some(status) = filter.status {
            condition = condition.add(sensor::Column::Status.eq(status.as_str()));
        }

        let models = SensorEntity::find()
            .filter(condition)
            .order_by_desc(sensor::Column::CreatedAt)
            .order_by_desc(sensor::Column::Id)
            .all(&self.db)
            .await?;

        let username = self.owner_username(owner_id).await?;
        models
            .into_iter()
            .map(|m| to_domain(m, username.clone()))
            .collect()
    }

    async fn find_owned(&self, id: i32, owner_id: i32) -> Result<Option<Sensor>, DomainError> {
        let model = match self.find_model(id, owner_id).await {
            Ok(m) => m,
            Err(DomainError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        let username = self.owner_username(owner_id).await?;
        to_domain(model, username).map(Some)
    }

    async fn create(&self, input: NewSensor) -> Result<Sensor, DomainError> {
        let now = now_timestamp();
        let model = sensor::ActiveModel {
            name: Set(input.name),
            sensor_type: Set(input.sensor_type.as_str().to_string()),
            location: Set(input.location),
            status: Set(input.status.as_str().to_string()),
            handler_class: Set(input.handler_class),
            connection_config: Set(input.connection_config.to_string()),
            metadata: Set(input.metadata.to_string()),
            owner_id: Set(input.owner_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;
        tracing::info!(
            "Registered sensor {} ({}) for user {}",
            saved.id,
            saved.sensor_type,
            saved.owner_id
        );
        let username = self.owner_username(saved.owner_id).await?;
        to_domain(saved, username)
    }

    async fn update(
        &self,
        id: i32,
        owner_id: i32,
        input: UpdateSensorInput,
    ) -> Result<Sensor, DomainError> {
        let existing = self.find_model(id, owner_id).await?;

        let mut active: sensor::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(sensor_type) = input.sensor_type {
            active.sensor_type = Set(sensor_type.as_str().to_string());
        }
        if let Some(location) = input.location {
            active.location = Set(location);
        }
        if let Some(status) = input.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(handler_class) = input.handler_class {
            active.handler_class = Set(handler_class);
        }
        if let Some(config) = input.connection_config {
            active.connection_config = Set(config.to_string());
        }
        if let Some(metadata) = input.metadata {
            active.metadata = Set(metadata.to_string());
        }
        active.updated_at = Set(now_timestamp());

        let saved = active.update(&self.db).await?;
        let username = self.owner_username(owner_id).await?;
        to_domain(saved, username)
    }

    async fn delete(&self, id: i32, owner_id: i32) -> Result<(), DomainError> {
        let result = SensorEntity::delete_many()
            .filter(sensor::Column::Id.eq(id))
            .filter(sensor::Column::OwnerId.eq(owner_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        tracing::info!("Deleted sensor {} of user {}", id, owner_id);
        Ok(())
    }
}
