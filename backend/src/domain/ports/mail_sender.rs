//! Port for the outbound delivery channel.
//!
//! The pipeline is agnostic to what sits behind this: a real mail API or an
//! adapter that only logs. The contract is arbitrary UTF-8 subject and body
//! in, a binary success or failure signal out.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by delivery adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailSendError {
    /// Transport failed before the channel accepted the message.
    #[error("mail transport failed: {message}")]
    Transport {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// The channel refused the message.
    #[error("mail rejected: {message}")]
    Rejected {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl MailSendError {
    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for channel rejections.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Port for sending one rendered message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Deliver `body` to `to` under `subject`.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailSendError>;
}

/// Fixture implementation that accepts every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureMailSender;

#[async_trait]
impl MailSender for FixtureMailSender {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), MailSendError> {
        Ok(())
    }
}
