//! Port for the notification audit trail.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::notification::NewNotificationRecord;

/// Errors raised by notification repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationRepositoryError {
    /// Repository connection could not be established.
    #[error("notification repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("notification repository query failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl NotificationRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for appending audit rows and reading the newest send time back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Append one audit row. Rows are never updated or deleted.
    async fn record(
        &self,
        record: &NewNotificationRecord,
    ) -> Result<(), NotificationRepositoryError>;

    /// When the newest audit row for `threshold_id` was written, if any.
    /// Consulted by the once-per-update repeat policy.
    async fn latest_sent_at(
        &self,
        threshold_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, NotificationRepositoryError>;
}

/// Fixture implementation that drops records and remembers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureNotificationRepository;

#[async_trait]
impl NotificationRepository for FixtureNotificationRepository {
    async fn record(
        &self,
        _record: &NewNotificationRecord,
    ) -> Result<(), NotificationRepositoryError> {
        Ok(())
    }

    async fn latest_sent_at(
        &self,
        _threshold_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, NotificationRepositoryError> {
        Ok(None)
    }
}
