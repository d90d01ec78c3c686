//! Configuration module for the publink client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Main application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub storage: S3Settings,
}

/// Connection settings for an S3-compatible object store
///
/// `endpoint` accepts any S3 API endpoint: MinIO, Cloudflare R2,
/// DigitalOcean Spaces, or AWS itself. `path` is a key prefix applied to
/// every uploaded object. `url_prefix`, when set, replaces the store's own
/// object URL in returned links (typically a CDN or custom domain).
#[derive(Debug, Clone, Deserialize)]
pub struct S3Settings {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub endpoint: String,
    #[serde(default)]
    pub path: String,
    pub region: String,
    #[serde(default)]
    pub url_prefix: String,
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (prefixed with PUBLINK_)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        let builder = Config::builder()
            // Start with default configuration
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local overrides (gitignored)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Add environment variables (PUBLINK_STORAGE__BUCKET, etc.)
            .add_source(
                Environment::with_prefix("PUBLINK")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}
