//! SeaORM implementation of AlertRepository

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::{parse_code, parse_json};
use crate::domain::{Alert, AlertFilter, AlertRepository, AlertStatistics, DomainError};
use crate::infrastructure::db::now_timestamp;
use crate::models::alert::{self, Entity as AlertEntity};
use crate::models::sensor::{self, Entity as SensorEntity};
use crate::models::user::{self, Entity as UserEntity};

pub(crate) fn to_domain(
    model: alert::Model,
    sensor_name: Option<String>,
    acknowledged_by_username: Option<String>,
) -> Result<Alert, DomainError> {
    Ok(Alert {
        id: model.id,
        alert_type: parse_code(&model.alert_type)?,
        severity: parse_code(&model.severity)?,
        metadata: parse_json(&model.metadata),
        sensor_id: model.sensor_id,
        sensor_name,
        user_id: model.user_id,
        timestamp: model.timestamp,
        title: model.title,
        description: model.description,
        acknowledged: model.acknowledged,
        acknowledged_at: model.acknowledged_at,
        acknowledged_by: model.acknowledged_by,
        acknowledged_by_username,
    })
}

/// SeaORM-based implementation of AlertRepository
pub struct SeaOrmAlertRepository {
    db: DatabaseConnection,
}

impl SeaOrmAlertRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach sensor names and acknowledging usernames to raw rows
    async fn hydrate(
        &self,
        rows: Vec<(alert::Model, Option<sensor::Model>)>,
    ) -> Result<Vec<Alert>, DomainError> {
        let mut acknowledger_ids: Vec<i32> =
            rows.iter().filter_map(|(a, _)| a.acknowledged_by).collect();
        acknowledger_ids.sort_unstable();
        acknowledger_ids.dedup();

        let mut usernames: HashMap<i32, String> = HashMap::new();
        if !acknowledger_ids.is_empty() {
            let users = UserEntity::find()
                .filter(user::Column::Id.is_in(acknowledger_ids))
                .all(&self.db)
                .await?;
            for u in users {
                usernames.insert(u.id, u.username);
            }
        }

        rows.into_iter()
            .map(|(alert, sensor)| {
                let acknowledged_by = alert
                    .acknowledged_by
                    .and_then(|id| usernames.get(&id).cloned());
                to_domain(alert, sensor.map(|s| s.name), acknowledged_by)
            })
            .collect()
    }
}

#[async_trait]
impl AlertRepository for SeaOrmAlertRepository {
    async fn find_for_user(&self, filter: AlertFilter) -> Result<Vec<Alert>, DomainError> {
        let mut condition = Condition::all().add(alert::Column::UserId.eq(filter.user_id));

        if let Some(severity) = filter.severity {
            condition = condition.add(alert::Column::Severity.eq(severity.as_str()));
        }

        if let Some(acknowledged) = filter.acknowledged {
            condition = condition.add(alert::Column::Acknowledged.eq(acknowledged));
        }

        let mut query = AlertEntity::find()
            .find_also_related(SensorEntity)
            .filter(condition)
            .order_by_desc(alert::Column::Timestamp)
            .order_by_desc(alert::Column::Id);

        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let rows = query.all(&self.db).await?;
        self.hydrate(rows).await
    }

    async fn find_owned(&self, id: i32, user_id: i32) -> Result<Option<Alert>, DomainError> {
        let rows = AlertEntity::find()
            .find_also_related(SensorEntity)
            .filter(alert::Column::Id.eq(id))
            .filter(alert::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;

        Ok(self.hydrate(rows).await?.into_iter().next())
    }

    async fn acknowledge(&self, id: i32, user_id: i32) -> Result<Alert, DomainError> {
        // Conditional update so two concurrent acknowledgements cannot both win
        let result = AlertEntity::update_many()
            .col_expr(alert::Column::Acknowledged, Expr::value(true))
            .col_expr(alert::Column::AcknowledgedAt, Expr::value(now_timestamp()))
            .col_expr(alert::Column::AcknowledgedBy, Expr::value(user_id))
            .filter(alert::Column::Id.eq(id))
            .filter(alert::Column::UserId.eq(user_id))
            .filter(alert::Column::Acknowledged.eq(false))
            .exec(&self.db)
            .await?;

        let alert = self
            .find_owned(id, user_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        if result.rows_affected == 0 {
            return Err(DomainError::Validation(
                "Alert already acknowledged".to_string(),
            ));
        }

        tracing::info!("Alert {} acknowledged by user {}", id, user_id);
        Ok(alert)
    }

    async fn statistics(&self, user_id: i32, recent: u64) -> Result<AlertStatistics, DomainError> {
        let total_alerts = AlertEntity::find()
            .filter(alert::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;

        let unacknowledged_alerts = AlertEntity::find()
            .filter(alert::Column::UserId.eq(user_id))
            .filter(alert::Column::Acknowledged.eq(false))
            .count(&self.db)
            .await?;

        let counts: Vec<(String, i64)> = AlertEntity::find()
            .select_only()
            .column(alert::Column::Severity)
            .column_as(Expr::col(alert::Column::Id).count(), "count")
            .filter(alert::Column::UserId.eq(user_id))
            .group_by(alert::Column::Severity)
            .into_tuple()
            .all(&self.db)
            .await?;

        let by_severity: BTreeMap<String, u64> = counts
            .into_iter()
            .map(|(severity, count)| (severity, count.max(0) as u64))
            .collect();

        let recent_alerts = self
            .find_for_user(AlertFilter {
                limit: Some(recent),
                ..AlertFilter::for_user(user_id)
            })
            .await?;

        Ok(AlertStatistics {
            total_alerts,
            unacknowledged_alerts,
            by_severity,
            recent_alerts,
        })
    }
}
