use bytes::Bytes;
use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::error::{AppError, Result};
use crate::models::{PhotoEntry, PhotoListResponse, UploadResponse};
use crate::storage::StorageProvider;

/// Fallback extension when neither filename nor MIME type yields one
const DEFAULT_EXTENSION: &str = "jpg";

pub struct PhotoService;

impl PhotoService {
    /// Generate a collision-resistant storage key:
    /// `<prefix>/<timestamp>_<id8>.<ext>`
    ///
    /// Uniqueness across concurrent uploads comes from the random suffix;
    /// two keys minted in the same millisecond still differ.
    pub fn generate_key(prefix: &str, original_name: &str, content_type: &str) -> String {
        // ISO-8601 with ':' and '.' flattened so the key stays URL-friendly
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ");
        let id = Uuid::new_v4().simple().to_string();
        let ext = Self::extension_for(original_name, content_type);
        format!(
            "{}/{}_{}.{}",
            prefix.trim_end_matches('/'),
            timestamp,
            &id[..8],
            ext
        )
    }

    /// Extension from the client filename, falling back to the MIME type
    fn extension_for(original_name: &str, content_type: &str) -> String {
        if let Some(ext) = Path::new(original_name).extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            if !ext.is_empty() {
                return ext;
            }
        }

        mime_guess::get_mime_extensions_str(content_type)
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
    }

    /// Only image payloads are accepted
    pub fn is_allowed_type(content_type: &str) -> bool {
        content_type.starts_with("image/")
    }

    /// Validate, store and describe one uploaded photo
    pub async fn upload(
        storage: &dyn StorageProvider,
        config: &UploadConfig,
        original_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<UploadResponse> {
        if !Self::is_allowed_type(content_type) {
            return Err(AppError::BadRequest(
                "Only image files are allowed".to_string(),
            ));
        }

        let size = data.len() as u64;
        if size > config.max_size_bytes {
            return Err(AppError::PayloadTooLarge {
                limit_bytes: config.max_size_bytes,
            });
        }

        let key = Self::generate_key(&config.key_prefix, original_name, content_type);
        storage.put(&key, data, content_type).await?;

        let public_url = storage.public_url(&key);
        tracing::info!("Photo uploaded: {} -> {}", original_name, public_url);

        Ok(UploadResponse {
            success: true,
            message: "Photo uploaded successfully".to_string(),
            filename: key,
            public_url,
            size,
            uploaded_at: Utc::now(),
        })
    }

    /// List photos under the configured prefix
    pub async fn list(
        storage: &dyn StorageProvider,
        config: &UploadConfig,
    ) -> Result<PhotoListResponse> {
        let entries = storage.list(&config.key_prefix).await?;

        let photos: Vec<PhotoEntry> = entries
            .into_iter()
            .map(|entry| {
                let public_url = storage.public_url(&entry.key);
                let content_type = mime_guess::from_path(&entry.key)
                    .first_or_octet_stream()
                    .to_string();
                PhotoEntry {
                    name: entry.key,
                    size: entry.size,
                    uploaded_at: entry.last_modified,
                    public_url,
                    content_type,
                }
            })
            .collect();

        Ok(PhotoListResponse {
            success: true,
            count: photos.len(),
            photos,
        })
    }

    /// Delete one photo by its bare filename under the configured prefix
    pub async fn delete(
        storage: &dyn StorageProvider,
        config: &UploadConfig,
        filename: &str,
    ) -> Result<()> {
        if filename.is_empty() || filename.contains('/') || filename.contains("..") {
            return Err(AppError::BadRequest("Invalid filename".to_string()));
        }

        let key = format!("{}/{}", config.key_prefix.trim_end_matches('/'), filename);
        storage.delete(&key).await?;
        tracing::info!("Photo deleted: {}", key);
        Ok(())
    }
}
