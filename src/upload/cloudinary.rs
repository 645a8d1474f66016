//! Cloudinary image host.
//!
//! Uploads use the signed REST endpoint: the request parameters are sorted,
//! joined as `key=value&...`, suffixed with the API secret and hashed with
//! SHA-256.
//!
//! Every upload gets a fresh public id, since a signed upload to an existing
//! id replaces that image.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ImageHost, ImageUpload};
use crate::config::UploadConfig;
use crate::{CatalogError, Result};

/// Total request timeout in seconds.
const UPLOAD_TIMEOUT_SECS: u64 = 10;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Uploads images to a Cloudinary account.
pub struct CloudinaryHost {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
    max_size: u64,
}

impl CloudinaryHost {
    /// Create a host from the upload configuration.
    pub fn from_config(config: &UploadConfig) -> Result<Self> {
        if config.cloud_name.is_empty() || config.api_key.is_empty() || config.api_secret.is_empty()
        {
            return Err(CatalogError::Config(
                "cloudinary backend requires cloud_name, api_key and api_secret".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| CatalogError::Dependency(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: config.folder.clone(),
            max_size: config.max_file_size_bytes,
        })
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}/image/upload", self.cloud_name)
    }

    /// Parameters that take part in the signature, sorted by key.
    ///
    /// The public id is `{uuid}-{file stem}`.
    fn signed_params(&self, image: &ImageUpload, timestamp: i64) -> Vec<(&'static str, String)> {
        let public_id = format!("{}-{}", Uuid::new_v4().simple(), image.stem());
        let mut params = vec![
            ("public_id", public_id),
            ("timestamp", timestamp.to_string()),
        ];
        if !self.folder.is_empty() {
            params.push(("folder", self.folder.clone()));
        }
        params.sort_by(|a, b| a.0.cmp(b.0));
        params
    }

    fn sign(&self, params: &[(&'static str, String)]) -> String {
        sign_params(params, &self.api_secret)
    }
}

/// Hex SHA-256 of `k1=v1&k2=v2...` followed by the secret.
fn sign_params(params: &[(&str, String)], secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl std::fmt::Debug for CloudinaryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryHost")
            .field("cloud_name", &self.cloud_name)
            .field("folder", &self.folder)
            .finish()
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, image: ImageUpload) -> Result<String> {
        image.validate(self.max_size)?;

        let params = self.signed_params(&image, chrono::Utc::now().timestamp());
        let signature = self.sign(&params);
        let public_id = params
            .iter()
            .find(|(key, _)| *key == "public_id")
            .map(|(_, value)| value.clone())
            .unwrap_or_default();

        let file_part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| CatalogError::Validation(format!("invalid content type: {e}")))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        debug!("Uploading image {} to cloudinary", public_id);
        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| CatalogError::Dependency(format!("image upload failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.to_string());
            warn!("Cloudinary rejected upload: {}", message);
            return Err(CatalogError::Dependency(format!(
                "image upload failed: {message}"
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Dependency(format!("invalid upload response: {e}")))?;

        info!("Uploaded image {}", public_id);
        Ok(body.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(file_name: &str) -> ImageUpload {
        ImageUpload::new(file_name, "image/png", vec![1])
    }

    fn config() -> UploadConfig {
        UploadConfig {
            backend: crate::config::UploadBackend::Cloudinary,
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            folder: "products".to_string(),
            ..UploadConfig::default()
        }
    }

    #[test]
    fn test_requires_credentials() {
        let config = UploadConfig {
            api_secret: String::new(),
            ..config()
        };
        assert!(matches!(
            CloudinaryHost::from_config(&config),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint() {
        let host = CloudinaryHost::from_config(&config()).unwrap();
        assert_eq!(
            host.endpoint(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[test]
    fn test_signed_params_sorted() {
        let host = CloudinaryHost::from_config(&config()).unwrap();
        let params = host.signed_params(&image("widget.png"), 1_700_000_000);
        let keys: Vec<_> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["folder", "public_id", "timestamp"]);
    }

    #[test]
    fn test_same_file_name_gets_distinct_public_ids() {
        let host = CloudinaryHost::from_config(&config()).unwrap();
        let public_id = |params: Vec<(&'static str, String)>| {
            params
                .into_iter()
                .find(|(k, _)| *k == "public_id")
                .map(|(_, v)| v)
                .unwrap()
        };

        let first = public_id(host.signed_params(&image("photo.png"), 1));
        let second = public_id(host.signed_params(&image("photo.png"), 1));

        assert_ne!(first, second);
        assert!(first.ends_with("-photo"));
        assert!(second.ends_with("-photo"));
    }

    #[test]
    fn test_signed_params_without_folder() {
        let config = UploadConfig {
            folder: String::new(),
            ..config()
        };
        let host = CloudinaryHost::from_config(&config).unwrap();
        let params = host.signed_params(&image("widget.png"), 1);
        assert!(params.iter().all(|(k, _)| *k != "folder"));
    }

    #[test]
    fn test_sign_params() {
        let params = vec![
            ("public_id", "widget".to_string()),
            ("timestamp", "1700000000".to_string()),
        ];
        let signature = sign_params(&params, "secret");

        let mut hasher = Sha256::new();
        hasher.update(b"public_id=widget&timestamp=1700000000secret");
        assert_eq!(signature, format!("{:x}", hasher.finalize()));
        assert_eq!(signature.len(), 64);
    }

    #[test]
    fn test_debug_hides_secret() {
        let host = CloudinaryHost::from_config(&config()).unwrap();
        let debug = format!("{host:?}");
        assert!(!debug.contains("secret"));
    }
}
