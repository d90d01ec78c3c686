//! Storage module for public object uploads
//!
//! Provides the upload client and the S3-backed store it drives. MinIO,
//! Cloudflare R2, DigitalOcean Spaces and AWS S3 all speak the same S3 API,
//! so we use the AWS SDK for every one of them.

mod s3;

pub use s3::S3Store;

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::S3Settings;

/// Boxed error carried as the cause of [`StorageError::Upload`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`StorageClient`]
#[derive(Debug, Error)]
pub enum StorageError {
    /// Required settings are missing or unusable
    #[error("storage configuration: {0}")]
    Configuration(String),

    /// The store rejected or failed the transfer; the underlying error is
    /// kept as the source
    #[error("upload failed: {source}")]
    Upload {
        #[source]
        source: BoxError,
    },

    /// The transfer succeeded but neither a URL prefix nor a reported
    /// location was available to build a link from
    #[error("upload succeeded but no link could be produced")]
    EmptyLink,
}

/// What the store reported back for a stored object
#[derive(Debug, Clone, Default)]
pub struct PutOutcome {
    /// URL the object is reachable under, when the store can tell
    pub location: Option<String>,
    /// Entity tag of the stored object, when reported
    pub etag: Option<String>,
}

/// Destination for uploaded objects
///
/// [`S3Store`] is the production implementation. The trait exists so the
/// client logic stays testable without a live bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        acl: ObjectCannedAcl,
        body: ByteStream,
    ) -> Result<PutOutcome, BoxError>;
}

/// Client for uploading objects and handing back public links
///
/// Cheap to clone; clones share the underlying store connection.
#[derive(Clone)]
pub struct StorageClient {
    store: Arc<dyn ObjectStore>,
    settings: S3Settings,
}

impl StorageClient {
    /// Build a client for the store described by `settings`.
    ///
    /// Nothing is contacted here; credentials and endpoint are only
    /// exercised by the first upload.
    pub fn new(settings: S3Settings) -> Self {
        let store = S3Store::new(&settings);
        StorageClient {
            store: Arc::new(store),
            settings,
        }
    }

    /// Build a client on top of any [`ObjectStore`] implementation.
    pub fn with_store(store: Arc<dyn ObjectStore>, settings: S3Settings) -> Self {
        StorageClient { store, settings }
    }

    /// Build a client from `S3_*` environment variables.
    ///
    /// `S3_PATH` and `S3_URL_PREFIX` are optional and default to empty.
    pub fn from_env() -> Result<Self, StorageError> {
        let access_key = std::env::var("S3_ACCESS_KEY")
            .map_err(|_| StorageError::Configuration("S3_ACCESS_KEY not set".to_string()))?;
        let secret_key = std::env::var("S3_SECRET_KEY")
            .map_err(|_| StorageError::Configuration("S3_SECRET_KEY not set".to_string()))?;
        let bucket = std::env::var("S3_BUCKET")
            .map_err(|_| StorageError::Configuration("S3_BUCKET not set".to_string()))?;
        let endpoint = std::env::var("S3_ENDPOINT")
            .map_err(|_| StorageError::Configuration("S3_ENDPOINT not set".to_string()))?;
        let region = std::env::var("S3_REGION")
            .map_err(|_| StorageError::Configuration("S3_REGION not set".to_string()))?;
        let path = std::env::var("S3_PATH").unwrap_or_default();
        let url_prefix = std::env::var("S3_URL_PREFIX").unwrap_or_default();

        Ok(StorageClient::new(S3Settings {
            access_key,
            secret_key,
            bucket,
            endpoint,
            path,
            region,
            url_prefix,
        }))
    }

    /// Settings this client was built with.
    pub fn settings(&self) -> &S3Settings {
        &self.settings
    }

    /// Upload `body` under `name` and return a public link to it.
    ///
    /// The object key is `name` joined onto the configured path prefix.
    /// The returned link is the configured URL prefix joined with `name`
    /// when a prefix is set, otherwise the object URL the store reported.
    /// Transfer mechanics, including any multipart handling, are left to
    /// the store.
    #[instrument(skip(self, body), fields(bucket = %self.settings.bucket))]
    pub async fn upload(
        &self,
        name: &str,
        content_type: &str,
        body: impl Into<ByteStream>,
    ) -> Result<String, StorageError> {
        let key = self.object_key(name);
        debug!(%key, "uploading object");

        let outcome = self
            .store
            .put_object(
                &self.settings.bucket,
                &key,
                content_type,
                ObjectCannedAcl::PublicRead,
                body.into(),
            )
            .await
            .map_err(|source| StorageError::Upload { source })?;

        if let Some(etag) = &outcome.etag {
            debug!(%etag, "object stored");
        }

        let link = match self.public_link(name) {
            Some(link) => link,
            None => match outcome.location {
                Some(location) if !location.is_empty() => location,
                _ => return Err(StorageError::EmptyLink),
            },
        };

        info!(%link, "upload complete");
        Ok(link)
    }

    /// Upload a file from disk under the object name `name`.
    pub async fn upload_file(
        &self,
        name: &str,
        content_type: &str,
        path: impl AsRef<std::path::Path>,
    ) -> Result<String, StorageError> {
        let body = ByteStream::from_path(path.as_ref())
            .await
            .map_err(|source| StorageError::Upload {
                source: Box::new(source),
            })?;

        self.upload(name, content_type, body).await
    }

    /// Link for `name` under the configured URL prefix, if one is set.
    ///
    /// The raw object name is used here, not the key. The path prefix
    /// shapes where the object lands in the bucket; the URL prefix is
    /// expected to already point there.
    pub fn public_link(&self, name: &str) -> Option<String> {
        if self.settings.url_prefix.is_empty() {
            return None;
        }
        Some(format!("{}/{}", self.settings.url_prefix, name))
    }

    /// Object key for `name`: the configured path prefix and the name,
    /// joined with a single slash. An empty side collapses to the other.
    /// Only a trailing separator is trimmed from the prefix; the name is
    /// taken as-is and callers own any sanitizing.
    fn object_key(&self, name: &str) -> String {
        let prefix = self.settings.path.trim_end_matches('/');
        if prefix.is_empty() {
            return name.to_string();
        }
        if name.is_empty() {
            return prefix.to_string();
        }
        format!("{prefix}/{name}")
    }
}
