//! Port for reading stored threshold definitions.
//!
//! Definitions are created and mutated by an administrative surface outside
//! this service; the pipeline consumes them read-only.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::threshold::ThresholdDefinition;

/// Errors raised by threshold repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdRepositoryError {
    /// Repository connection could not be established.
    #[error("threshold repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Query failed during execution.
    #[error("threshold repository query failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl ThresholdRepositoryError {
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

/// Port for listing every stored threshold definition.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThresholdRepository: Send + Sync {
    /// Load all definitions. Evaluation order across them is unspecified.
    async fn list_all(&self) -> Result<Vec<ThresholdDefinition>, ThresholdRepositoryError>;
}

/// Fixture implementation with no definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureThresholdRepository;

#[async_trait]
impl ThresholdRepository for FixtureThresholdRepository {
    async fn list_all(&self) -> Result<Vec<ThresholdDefinition>, ThresholdRepositoryError> {
        Ok(Vec::new())
    }
}
