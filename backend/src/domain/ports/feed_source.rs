//! Driven port for fetching the latest readings from the external feed.
//!
//! The domain owns the request and response shapes so cycle orchestration
//! stays adapter-agnostic. One call covers the whole catalog; the feed is
//! queried in a single batched request, never per series.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::series::{IndicatorReading, SeriesId};

/// Errors surfaced while fetching from the feed. Any of these aborts the
/// cycle before reconciliation writes anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedSourceError {
    /// Network transport failed before a response arrived.
    #[error("feed transport failed: {message}")]
    Transport {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// The feed call exceeded its timeout.
    #[error("feed timeout: {message}")]
    Timeout {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// The response envelope reported a non-success status.
    #[error("feed request failed with status {status:?}")]
    Envelope {
        /// Status string from the response envelope.
        status: String,
    },
    /// The response body could not be decoded.
    #[error("feed response decode failed: {message}")]
    Decode {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// The adapter rejected the request before sending it.
    #[error("feed request invalid: {message}")]
    InvalidRequest {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl FeedSourceError {
    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for timeouts.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Helper for envelope-level failures.
    pub fn envelope(status: impl Into<String>) -> Self {
        Self::Envelope {
            status: status.into(),
        }
    }

    /// Helper for decode failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Helper for locally rejected requests.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

/// Port for fetching the latest reading of each requested series.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IndicatorFeedSource: Send + Sync {
    /// Fetch the most recent reading per series in one batched request.
    ///
    /// Series whose published value or period tag cannot be parsed are
    /// absent from the returned map; only transport, envelope, or whole-body
    /// decode failures error the batch.
    async fn fetch_latest(
        &self,
        series: &[SeriesId],
    ) -> Result<BTreeMap<SeriesId, IndicatorReading>, FeedSourceError>;
}

/// Fixture implementation returning an empty batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureIndicatorFeedSource;

#[async_trait]
impl IndicatorFeedSource for FixtureIndicatorFeedSource {
    async fn fetch_latest(
        &self,
        _series: &[SeriesId],
    ) -> Result<BTreeMap<SeriesId, IndicatorReading>, FeedSourceError> {
        Ok(BTreeMap::new())
    }
}
