use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// One object as seen by a listing
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Storage provider trait
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Upload an object and mark it publicly readable
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<()>;

    /// Download an object
    async fn get(&self, key: &str) -> Result<Bytes>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> Result<bool>;

    /// List objects under a key prefix
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>>;

    /// Verify the backend is reachable; probed once at startup
    async fn healthcheck(&self) -> Result<()> {
        Ok(())
    }

    /// Durable public address of an object
    fn public_url(&self, key: &str) -> String;

    /// Get the storage type name
    fn storage_type(&self) -> &'static str;
}
