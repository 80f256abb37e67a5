//! Port for indicator persistence: the transactional reconcile merge and
//! the reads evaluation performs afterwards.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::indicator::Indicator;
use crate::domain::reconcile::ReconciliationOutcome;
use crate::domain::series::{IndicatorReading, SeriesId};

/// Errors raised by indicator repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorRepositoryError {
    /// Repository connection could not be established.
    #[error("indicator repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Query or mutation failed during execution; for `reconcile` this
    /// means the whole batch rolled back.
    #[error("indicator repository query failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl IndicatorRepositoryError {
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

/// Port for reconciling fetched readings and reading indicator state back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IndicatorRepository: Send + Sync {
    /// Merge one fetched batch inside a single transaction.
    ///
    /// The adapter commits only when at least one row was inserted or
    /// updated; a batch of stale or untracked readings rolls back and
    /// reports an unchanged outcome. Any statement failure rolls the whole
    /// batch back; partial reconciliation is never committed.
    async fn reconcile(
        &self,
        readings: &BTreeMap<SeriesId, IndicatorReading>,
    ) -> Result<ReconciliationOutcome, IndicatorRepositoryError>;

    /// Fetch one indicator by row id.
    async fn find_by_id(
        &self,
        indicator_id: Uuid,
    ) -> Result<Option<Indicator>, IndicatorRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureIndicatorRepository;

#[async_trait]
impl IndicatorRepository for FixtureIndicatorRepository {
    async fn reconcile(
        &self,
        readings: &BTreeMap<SeriesId, IndicatorReading>,
    ) -> Result<ReconciliationOutcome, IndicatorRepositoryError> {
        let skipped = u32::try_from(readings.len()).unwrap_or(u32::MAX);
        Ok(ReconciliationOutcome::unchanged(skipped))
    }

    async fn find_by_id(
        &self,
        _indicator_id: Uuid,
    ) -> Result<Option<Indicator>, IndicatorRepositoryError> {
        Ok(None)
    }
}
