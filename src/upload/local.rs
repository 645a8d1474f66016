//! Local disk image store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::{ImageHost, ImageUpload};
use crate::Result;

/// Stores images as `{uuid}.{ext}` files in one directory.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    base_path: PathBuf,
    public_base_url: String,
    max_size: u64,
}

impl LocalImageStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(
        base_path: impl Into<PathBuf>,
        public_base_url: &str,
        max_size: u64,
    ) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_size,
        })
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn extract_extension(file_name: &str) -> String {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string())
    }
}

#[async_trait]
impl ImageHost for LocalImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<String> {
        image.validate(self.max_size)?;

        let stored_name = format!(
            "{}.{}",
            Uuid::new_v4(),
            Self::extract_extension(&image.file_name)
        );
        tokio::fs::write(self.base_path.join(&stored_name), &image.bytes).await?;

        info!(
            "Stored image {} ({} bytes) as {}",
            image.stem(),
            image.bytes.len(),
            stored_name
        );
        Ok(format!("{}/{}", self.public_base_url, stored_name))
    }
}
