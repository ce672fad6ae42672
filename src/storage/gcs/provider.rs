//! StorageProvider implementation backed by the GCS client

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::config::GcsConfig;
use crate::error::{AppError, Result};
use crate::storage::{ObjectEntry, StorageProvider};

use super::acl::{AclHeader, ObjectAcl};
use super::client::Client;

// Page size for bucket listings; listing keeps fetching pages until the
// server reports the result complete.
const LIST_PAGE_SIZE: u32 = 1000;

/// Google Cloud Storage provider
pub struct GcsStorage {
    client: Client,
}

impl GcsStorage {
    pub fn new(config: &GcsConfig) -> Self {
        let client = Client::new(
            &config.access_id,
            &config.secret,
            &config.bucket,
            &config.endpoint,
        );
        Self { client }
    }

    fn public_read() -> AclHeader {
        let mut acl = AclHeader::new();
        acl.insert_object_acl(ObjectAcl::PublicRead);
        acl
    }
}

#[async_trait]
impl StorageProvider for GcsStorage {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        let mime_type = content_type
            .parse::<mime::Mime>()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);

        let res = self
            .client
            .put_object_binary(data, key, Some(mime_type), Some(Self::public_read()))
            .await;

        if !res.is_success() {
            return Err(AppError::Storage {
                operation: "Failed to upload photo",
                message: format!("GCS upload failed: [{}] {}", res.error_no, res.error_message),
            });
        }

        tracing::info!("Uploaded to gs://{}/{}", self.client.get_bucket(), key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        let res = self.client.get_object_binary(key).await;

        if !res.is_success() {
            if res.is_not_found() {
                return Err(AppError::NotFound(format!("Object not found: {}", key)));
            }
            return Err(AppError::Storage {
                operation: "Failed to fetch photo",
                message: format!(
                    "GCS download failed: [{}] {}",
                    res.error_no, res.error_message
                ),
            });
        }

        Ok(Bytes::from(res.result))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let res = self.client.delete_object(key).await;

        if !res.is_success() && !res.is_not_found() {
            return Err(AppError::Storage {
                operation: "Failed to delete photo",
                message: format!(
                    "GCS delete failed: [{}] {}",
                    res.error_no, res.error_message
                ),
            });
        }

        tracing::debug!("Deleted gs://{}/{}", self.client.get_bucket(), key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.client.get_object_size(key).await >= 0)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>> {
        let prefix = format!("{}/", prefix.trim_end_matches('/'));
        let mut entries = Vec::new();
        let mut marker: Option<String> = None;

        // Listings come back in pages; follow the markers until complete
        loop {
            let result = self
                .client
                .list_objects(Some(&prefix), Some(LIST_PAGE_SIZE), marker.as_deref())
                .await
                .map_err(|res| AppError::Storage {
                    operation: "Failed to fetch photos",
                    message: format!(
                        "GCS listing failed: [{}] {}",
                        res.error_no, res.error_message
                    ),
                })?;

            let next = result.next_page_start();
            entries.extend(result.contents.into_iter().map(|entry| {
                let last_modified = DateTime::parse_from_rfc3339(&entry.last_modified)
                    .ok()
                    .map(|t| t.with_timezone(&Utc));
                ObjectEntry {
                    key: entry.key,
                    size: entry.size,
                    last_modified,
                }
            }));

            match next {
                Some(m) => marker = Some(m),
                None => break,
            }
        }

        Ok(entries)
    }

    async fn healthcheck(&self) -> Result<()> {
        if self.client.bucket_exists().await {
            Ok(())
        } else {
            Err(AppError::Storage {
                operation: "Storage bucket unreachable",
                message: format!(
                    "gs://{} did not answer the startup probe",
                    self.client.get_bucket()
                ),
            })
        }
    }

    fn public_url(&self, key: &str) -> String {
        self.client.get_public_url(key)
    }

    fn storage_type(&self) -> &'static str {
        "gcs"
    }
}
