//! Directory-backed storage for local development.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{validate_path, ObjectStorage, StorageError};

pub struct LocalStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<String, StorageError> {
        validate_path(path)?;
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        log::debug!("storage: wrote {}", target.display());

        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            path
        ))
    }
}
