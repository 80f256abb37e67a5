//! Port for looking up a threshold owner's contact address.
//!
//! The lookup is only issued when a definition has owner notification
//! enabled; dispatch never queries user rows otherwise.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by user directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserDirectoryError {
    /// Directory connection could not be established.
    #[error("user directory connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Query failed during execution.
    #[error("user directory query failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl UserDirectoryError {
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

/// Port for resolving a user's email address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Return the email of `user_id`, or `None` for an unknown user.
    async fn email_of(&self, user_id: Uuid) -> Result<Option<String>, UserDirectoryError>;
}

/// Fixture implementation that knows no users.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUserDirectory;

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn email_of(&self, _user_id: Uuid) -> Result<Option<String>, UserDirectoryError> {
        Ok(None)
    }
}
