//! Template store reading bodies from a directory on disk.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::ports::{TemplateName, TemplateStore, TemplateStoreError};

/// Store resolving each [`TemplateName`] to a file under one root directory.
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TemplateStore for FsTemplateStore {
    async fn read(&self, name: TemplateName) -> Result<String, TemplateStoreError> {
        let path = self.root.join(name.file_name());
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(body),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                Err(TemplateStoreError::not_found(name))
            }
            Err(error) => Err(TemplateStoreError::io(name, error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[tokio::test]
    async fn reads_an_existing_template() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(TemplateName::RecipientAdverse.file_name());
        std::fs::write(&path, "Dear [Recipient Name],").expect("write template");

        let store = FsTemplateStore::new(dir.path());
        let body = store
            .read(TemplateName::RecipientAdverse)
            .await
            .expect("template reads");
        assert_eq!(body, "Dear [Recipient Name],");
    }

    #[tokio::test]
    async fn missing_template_maps_to_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FsTemplateStore::new(dir.path());

        let error = store
            .read(TemplateName::OwnerSummary)
            .await
            .expect_err("missing template fails");
        assert_eq!(
            error,
            TemplateStoreError::not_found(TemplateName::OwnerSummary)
        );
    }
}
