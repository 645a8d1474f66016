//! Image upload for product pictures.
//!
//! Uploads go through the [`ImageHost`] trait so the web layer does not care
//! whether the bytes land on local disk or on Cloudinary:
//! - [`LocalImageStore`] writes UUID-named files under a directory
//! - [`CloudinaryHost`] performs a signed upload to the Cloudinary API

mod cloudinary;
mod local;

pub use cloudinary::CloudinaryHost;
pub use local::LocalImageStore;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{UploadBackend, UploadConfig};
use crate::{CatalogError, Result};

/// An image received from a client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original file name as sent by the client.
    pub file_name: String,
    /// Declared content type.
    pub content_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Create a new upload.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Check size and content type before the upload is handed to a host.
    pub fn validate(&self, max_size: u64) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(CatalogError::Validation("image file is empty".to_string()));
        }
        if self.bytes.len() as u64 > max_size {
            return Err(CatalogError::PayloadTooLarge(format!(
                "file size exceeds the maximum allowed size of {max_size} bytes"
            )));
        }
        if !self.content_type.starts_with("image/") {
            return Err(CatalogError::Validation("file is not an image".to_string()));
        }
        Ok(())
    }

    /// The file name without directory or extension.
    pub fn stem(&self) -> String {
        let path = Path::new(&self.file_name);
        path.file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("image")
            .to_string()
    }
}

/// A place product images can be stored.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Store the image and return its public URL.
    ///
    /// Implementations run [`ImageUpload::validate`] first.
    async fn upload(&self, image: ImageUpload) -> Result<String>;
}

/// Build the image host selected by the configuration.
pub fn from_config(config: &UploadConfig) -> Result<Arc<dyn ImageHost>> {
    match config.backend {
        UploadBackend::Local => Ok(Arc::new(LocalImageStore::new(
            &config.storage_path,
            &config.public_base_url,
            config.max_file_size_bytes,
        )?)),
        UploadBackend::Cloudinary => Ok(Arc::new(CloudinaryHost::from_config(config)?)),
    }
}
