//! SeaORM implementation of ReadingRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::{alert_repository, parse_json};
use crate::domain::{
    DomainError, IngestedReading, NewReading, ReadingFilter, ReadingRepository, Sensor,
    SensorReading, ThreatDetector,
};
use crate::infrastructure::db::now_timestamp;
use crate::models::alert;
use crate::models::sensor::{self, Entity as SensorEntity};
use crate::models::sensor_reading::{self, Entity as ReadingEntity};

fn to_domain(model: sensor_reading::Model, sensor_name: String) -> SensorReading {
    SensorReading {
        id: model.id,
        sensor_id: model.sensor_id,
        sensor_name,
        timestamp: model.timestamp,
        value: parse_json(&model.value),
        reading_type: model.reading_type,
        processed: model.processed,
    }
}

fn with_sensor_names(
    rows: Vec<(sensor_reading::Model, Option<sensor::Model>)>,
) -> Vec<SensorReading> {
    rows.into_iter()
        .map(|(reading, sensor)| {
            let name = sensor.map(|s| s.name).unwrap_or_default();
            to_domain(reading, name)
        })
        .collect()
}

/// SeaORM-based implementation of ReadingRepository
pub struct SeaOrmReadingRepository {
    db: DatabaseConnection,
}

impl SeaOrmReadingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReadingRepository for SeaOrmReadingRepository {
    async fn ingest(
        &self,
        sensor: &Sensor,
        reading: NewReading,
        detect: ThreatDetector<'_>,
    ) -> Result<IngestedReading, DomainError> {
        let txn = self.db.begin().await?;

        let stored = sensor_reading::ActiveModel {
            sensor_id: Set(reading.sensor_id),
            timestamp: Set(now_timestamp()),
            value: Set(reading.value.to_string()),
            reading_type: Set(reading.reading_type),
            processed: Set(false),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let drafts = detect(&to_domain(stored.clone(), sensor.name.clone()));

        let mut alerts = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let saved = alert::ActiveModel {
                alert_type: Set(draft.alert_type.as_str().to_string()),
                severity: Set(draft.severity.as_str().to_string()),
                sensor_id: Set(Some(sensor.id)),
                user_id: Set(sensor.owner_id),
                timestamp: Set(now_timestamp()),
                title: Set(draft.title),
                description: Set(draft.description),
                acknowledged: Set(false),
                acknowledged_at: Set(None),
                acknowledged_by: Set(None),
                metadata: Set(draft.metadata.to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            tracing::info!(
                "Alert {} raised: {} [{}] for user {}",
                saved.id,
                saved.alert_type,
                saved.severity,
                saved.user_id
            );
            alerts.push(alert_repository::to_domain(
                saved,
                Some(sensor.name.clone()),
                None,
            )?);
        }

        let mut active: sensor_reading::ActiveModel = stored.into();
        active.processed = Set(true);
        let processed = active.update(&txn).await?;

        txn.commit().await?;

        Ok(IngestedReading {
            reading: to_domain(processed, sensor.name.clone()),
            alerts,
        })
    }

    async fn history(
        &self,
        sensor: &Sensor,
        limit: u64,
    ) -> Result<Vec<SensorReading>, DomainError> {
        let readings = ReadingEntity::find()
            .filter(sensor_reading::Column::SensorId.eq(sensor.id))
            .order_by_desc(sensor_reading::Column::Timestamp)
            .order_by_desc(sensor_reading::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(readings
            .into_iter()
            .map(|r| to_domain(r, sensor.name.clone()))
            .collect())
    }

    async fn find_for_owner(
        &self,
        filter: ReadingFilter,
    ) -> Result<Vec<SensorReading>, DomainError> {
        let mut query = ReadingEntity::find()
            .find_also_related(SensorEntity)
            .filter(sensor::Column::OwnerId.eq(filter.owner_id));

        if let Some(sensor_id) = filter.sensor_id {
            query = query.filter(sensor_reading::Column::SensorId.eq(sensor_id));
        }

        if let Some(processed) = filter.processed {
            query = query.filter(sensor_reading::Column::Processed.eq(processed));
        }

        let rows = query
            .order_by_desc(sensor_reading::Column::Timestamp)
            .order_by_desc(sensor_reading::Column::Id)
            .limit(filter.limit)
            .all(&self.db)
            .await?;

        Ok(with_sensor_names(rows))
    }

    async fn find_owned(
        &self,
        id: i32,
        owner_id: i32,
    ) -> Result<Option<SensorReading>, DomainError> {
        let rows = ReadingEntity::find()
            .find_also_related(SensorEntity)
            .filter(sensor_reading::Column::Id.eq(id))
            .filter(sensor::Column::OwnerId.eq(owner_id))
            .all(&self.db)
            .await?;

        Ok(with_sensor_names(rows).into_iter().next())
    }
}
