//! PostgreSQL-backed `ThresholdRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ThresholdRepository, ThresholdRepositoryError};
use crate::domain::ThresholdDefinition;

use super::diesel_support::{classify_diesel_error, pool_error_message, DbErrorClass};
use super::models::ThresholdRow;
use super::pool::{DbPool, PoolError};
use super::schema::thresholds;

/// Diesel-backed implementation of the threshold repository port.
#[derive(Clone)]
pub struct DieselThresholdRepository {
    pool: DbPool,
}

impl DieselThresholdRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ThresholdRepositoryError {
    ThresholdRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ThresholdRepositoryError {
    match classify_diesel_error(&error) {
        (DbErrorClass::Connection, message) => ThresholdRepositoryError::connection(message),
        (DbErrorClass::Query, message) => ThresholdRepositoryError::query(message),
    }
}

fn row_to_definition(row: ThresholdRow) -> ThresholdDefinition {
    ThresholdDefinition {
        id: row.id,
        owner_user_id: row.user_id,
        indicator_id: row.indicator_id,
        magnitude_percent: row.magnitude_percent,
        notify_owner: row.notify_owner,
        created_at: row.created_at,
    }
}

#[async_trait]
impl ThresholdRepository for DieselThresholdRepository {
    async fn list_all(&self) -> Result<Vec<ThresholdDefinition>, ThresholdRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ThresholdRow> = thresholds::table
            .select(ThresholdRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_definition).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn row_conversion_preserves_every_field() {
        let row = ThresholdRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            indicator_id: Uuid::new_v4(),
            magnitude_percent: 12.5,
            notify_owner: true,
            created_at: Utc::now(),
        };
        let definition = row_to_definition(row.clone());
        assert_eq!(definition.id, row.id);
        assert_eq!(definition.owner_user_id, row.user_id);
        assert_eq!(definition.indicator_id, row.indicator_id);
        assert_eq!(definition.magnitude_percent, 12.5);
        assert!(definition.notify_owner);
    }
}
