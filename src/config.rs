//! Configuration module for the catalog service.

use serde::Deserialize;
use std::path::Path;

use crate::{CatalogError, Result};

/// Signing secret used when none is configured.
///
/// Running with this value is a security downgrade; startup logs a warning.
pub const DEFAULT_JWT_SECRET: &str = "your-256-bit-secret";

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5050
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL (e.g. `sqlite://data/catalog.db`). Mandatory.
    #[serde(default)]
    pub url: String,
    /// Maximum pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

/// Session token configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret.
    #[serde(default)]
    pub jwt_secret: String,
}

impl AuthConfig {
    /// Return the configured signing secret, or the documented default.
    ///
    /// Falling back to the default is logged at warn level.
    pub fn signing_secret(&self) -> String {
        if self.jwt_secret.is_empty() {
            tracing::warn!(
                "JWT_SECRET_KEY not set. Using the default signing key; \
                 set a strong secret before running in production."
            );
            DEFAULT_JWT_SECRET.to_string()
        } else {
            self.jwt_secret.clone()
        }
    }
}

/// Image upload backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadBackend {
    /// Store images on local disk.
    #[default]
    Local,
    /// Upload images to Cloudinary.
    Cloudinary,
}

/// Image upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Which backend receives uploaded images.
    #[serde(default)]
    pub backend: UploadBackend,
    /// Maximum accepted image size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Local storage directory.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// URL prefix under which locally stored images are served.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Cloudinary cloud name.
    #[serde(default)]
    pub cloud_name: String,
    /// Cloudinary API key.
    #[serde(default)]
    pub api_key: String,
    /// Cloudinary API secret.
    #[serde(default)]
    pub api_secret: String,
    /// Cloudinary folder for uploads.
    #[serde(default)]
    pub folder: String,
}

fn default_max_file_size() -> u64 {
    2 * 1024 * 1024
}

fn default_storage_path() -> String {
    "data/images".to_string()
}

fn default_public_base_url() -> String {
    "/images".to_string()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            backend: UploadBackend::default(),
            max_file_size_bytes: default_max_file_size(),
            storage_path: default_storage_path(),
            public_base_url: default_public_base_url(),
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file; empty logs to stdout only.
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/catalog.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
            json: false,
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session token configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Image upload configuration.
    #[serde(default)]
    pub uploads: UploadConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CatalogError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CatalogError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`
    /// - `DATABASE_URL`
    /// - `JWT_SECRET_KEY`
    /// - `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`,
    ///   `CLOUDINARY_UPLOAD_FOLDER`
    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = env_value("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = env_value("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = env_value("JWT_SECRET_KEY") {
            self.auth.jwt_secret = secret;
        }
        if let Some(name) = env_value("CLOUDINARY_CLOUD_NAME") {
            self.uploads.cloud_name = name;
        }
        if let Some(key) = env_value("CLOUDINARY_API_KEY") {
            self.uploads.api_key = key;
        }
        if let Some(secret) = env_value("CLOUDINARY_API_SECRET") {
            self.uploads.api_secret = secret;
        }
        if let Some(folder) = env_value("CLOUDINARY_UPLOAD_FOLDER") {
            self.uploads.folder = folder;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The database URL is not set
    /// - The Cloudinary backend is selected without credentials
    ///
    /// A missing JWT secret is not an error; see [`AuthConfig::signing_secret`].
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(CatalogError::Config(
                "database.url is not set. \
                 Set it in config.toml or via the DATABASE_URL environment variable."
                    .to_string(),
            ));
        }

        if self.uploads.backend == UploadBackend::Cloudinary
            && (self.uploads.cloud_name.is_empty()
                || self.uploads.api_key.is_empty()
                || self.uploads.api_secret.is_empty())
        {
            return Err(CatalogError::Config(
                "cloudinary upload backend requires cloud_name, api_key and api_secret"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
