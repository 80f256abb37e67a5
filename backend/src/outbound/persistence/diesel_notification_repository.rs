//! PostgreSQL-backed `NotificationRepository` implementation using Diesel
//! ORM.
//!
//! The audit trail is append-only: this adapter inserts rows and reads the
//! newest send time per threshold; nothing here updates or deletes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::NewNotificationRecord;

use super::diesel_support::{classify_diesel_error, pool_error_message, DbErrorClass};
use super::models::NewNotificationRow;
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the notification repository port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotificationRepositoryError {
    NotificationRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> NotificationRepositoryError {
    match classify_diesel_error(&error) {
        (DbErrorClass::Connection, message) => NotificationRepositoryError::connection(message),
        (DbErrorClass::Query, message) => NotificationRepositoryError::query(message),
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn record(
        &self,
        record: &NewNotificationRecord,
    ) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(notifications::table)
            .values(NewNotificationRow {
                id: Uuid::new_v4(),
                user_id: record.user_id,
                recipient_id: record.recipient_id,
                threshold_id: record.threshold_id,
                sent_at: record.sent_at,
                user_message: record.user_message.as_str(),
                recipient_message: record.recipient_message.as_str(),
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn latest_sent_at(
        &self,
        threshold_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        notifications::table
            .filter(notifications::threshold_id.eq(threshold_id))
            .order(notifications::sent_at.desc())
            .select(notifications::sent_at)
            .first::<DateTime<Utc>>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }
}
