//! Port for loading notification template bodies.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// The fixed set of templates dispatch renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    /// Recipient message for a breach on the unfavourable side.
    RecipientAdverse,
    /// Recipient message for every other breach.
    RecipientFavorable,
    /// Owner summary listing the recipient roster.
    OwnerSummary,
}

impl TemplateName {
    /// File name the store resolves this template under.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::RecipientAdverse => "recipient_adverse.txt",
            Self::RecipientFavorable => "recipient_favorable.txt",
            Self::OwnerSummary => "owner_summary.txt",
        }
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Errors raised by template store adapters. Both fail only the message
/// being rendered, never the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateStoreError {
    /// The named template does not exist in the store.
    #[error("template {name} not found")]
    NotFound {
        /// Template the read was for.
        name: TemplateName,
    },
    /// Reading the template failed.
    #[error("template {name} unreadable: {message}")]
    Io {
        /// Template the read was for.
        name: TemplateName,
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl TemplateStoreError {
    /// Helper for missing templates.
    pub fn not_found(name: TemplateName) -> Self {
        Self::NotFound { name }
    }

    /// Helper for read failures.
    pub fn io(name: TemplateName, message: impl Into<String>) -> Self {
        Self::Io {
            name,
            message: message.into(),
        }
    }
}

/// Port for reading template bodies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Read the body of `name`. Placeholders are substituted by the caller.
    async fn read(&self, name: TemplateName) -> Result<String, TemplateStoreError>;
}

/// Fixture implementation serving a minimal placeholder-bearing body.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureTemplateStore;

#[async_trait]
impl TemplateStore for FixtureTemplateStore {
    async fn read(&self, name: TemplateName) -> Result<String, TemplateStoreError> {
        Ok(match name {
            TemplateName::RecipientAdverse | TemplateName::RecipientFavorable => {
                "Dear [Recipient Name], [Threshold Name] moved [Change Percentage]%.".to_owned()
            }
            TemplateName::OwnerSummary => {
                "[Threshold Name] moved [Change Percentage]%. Notified:\n[Recipient List]"
                    .to_owned()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[test]
    fn file_names_are_stable() {
        assert_eq!(
            TemplateName::RecipientAdverse.file_name(),
            "recipient_adverse.txt"
        );
        assert_eq!(
            TemplateName::RecipientFavorable.file_name(),
            "recipient_favorable.txt"
        );
        assert_eq!(TemplateName::OwnerSummary.file_name(), "owner_summary.txt");
    }
}
