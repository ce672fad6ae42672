use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::LocalConfig;
use crate::error::{AppError, Result};
use crate::storage::{ObjectEntry, StorageProvider};

/// Local file system storage provider, used for development and tests
pub struct LocalStorage {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(config: LocalConfig) -> Self {
        Self {
            base_path: PathBuf::from(config.base_path),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_full_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> Result<()> {
        let full_path = self.get_full_path(key);

        // Ensure parent directory exists
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&full_path).await?;
        file.write_all(&data).await?;
        file.flush().await?;

        tracing::debug!("Saved object to {:?}", full_path);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        let full_path = self.get_full_path(key);

        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("Object not found: {}", key))
            } else {
                AppError::Storage {
                    operation: "Failed to fetch photo",
                    message: format!("Failed to read object: {}", e),
                }
            }
        })?;

        Ok(Bytes::from(data))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let full_path = self.get_full_path(key);

        if full_path.exists() {
            fs::remove_file(&full_path).await?;
            tracing::debug!("Deleted object {:?}", full_path);
        }

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get_full_path(key).exists())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>> {
        let dir = self.base_path.join(prefix.trim_end_matches('/'));
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(&dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            let last_modified = metadata
                .modified()
                .ok()
                .map(|t| DateTime::<Utc>::from(t));
            entries.push(ObjectEntry {
                key: format!("{}/{}", prefix.trim_end_matches('/'), name),
                size: metadata.len(),
                last_modified,
            });
        }

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    fn storage_type(&self) -> &'static str {
        "local"
    }
}
