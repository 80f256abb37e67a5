//! Port for resolving the recipient roster of a threshold.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::recipient::Recipient;

/// Errors raised by recipient repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipientRepositoryError {
    /// Repository connection could not be established.
    #[error("recipient repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Query failed during execution.
    #[error("recipient repository query failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl RecipientRepositoryError {
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

/// Port for loading recipients joined to a threshold.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipientRepository: Send + Sync {
    /// Load the roster for one threshold. An empty roster is valid; a
    /// definition may fan out to nobody but its owner.
    async fn list_for_threshold(
        &self,
        threshold_id: Uuid,
    ) -> Result<Vec<Recipient>, RecipientRepositoryError>;
}

/// Fixture implementation with an empty roster.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureRecipientRepository;

#[async_trait]
impl RecipientRepository for FixtureRecipientRepository {
    async fn list_for_threshold(
        &self,
        _threshold_id: Uuid,
    ) -> Result<Vec<Recipient>, RecipientRepositoryError> {
        Ok(Vec::new())
    }
}
