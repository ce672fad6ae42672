pub mod gcs;
pub mod local;
pub mod provider;

pub use gcs::GcsStorage;
pub use local::LocalStorage;
pub use provider::*;

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};

/// Build the storage provider selected by configuration
pub fn build_provider(config: &StorageConfig) -> Result<Arc<dyn StorageProvider>> {
    match config.backend.as_str() {
        "gcs" => Ok(Arc::new(GcsStorage::new(&config.gcs))),
        "local" => Ok(Arc::new(LocalStorage::new(config.local.clone()))),
        other => Err(AppError::Internal(format!(
            "Unknown storage backend: {}",
            other
        ))),
    }
}
