//! S3-backed object store
//!
//! Works against any endpoint speaking the S3 API, so the same client
//! covers MinIO, Cloudflare R2, DigitalOcean Spaces and AWS itself.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    types::ObjectCannedAcl,
    Client as S3Client,
};
use tracing::debug;

use crate::config::S3Settings;
use crate::storage::{BoxError, ObjectStore, PutOutcome};

/// Object store speaking the S3 API
#[derive(Clone)]
pub struct S3Store {
    client: S3Client,
    endpoint: String,
}

impl S3Store {
    /// Create a store for the endpoint described by `settings`.
    ///
    /// Construction only wires up the SDK client; no request is made
    /// until the first put.
    pub fn new(settings: &S3Settings) -> Self {
        debug!("Creating S3 client with endpoint: {}", settings.endpoint);

        let credentials = Credentials::new(
            &settings.access_key,
            &settings.secret_key,
            None, // session token
            None, // expiry
            "publink-static-credentials",
        );

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&settings.endpoint)
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true) // MinIO and R2 need path-style addressing
            .build();

        let client = S3Client::from_conf(config);

        Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Path-style URL the object is served under.
    ///
    /// The S3 PutObject response carries no location field, so the URL is
    /// derived from the endpoint. None when no endpoint is configured.
    fn object_url(&self, bucket: &str, key: &str) -> Option<String> {
        if self.endpoint.is_empty() {
            return None;
        }
        Some(format!("{}/{}/{}", self.endpoint, bucket, key))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        acl: ObjectCannedAcl,
        body: ByteStream,
    ) -> Result<PutOutcome, BoxError> {
        let result = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .acl(acl)
            .body(body)
            .send()
            .await?;

        let etag = result.e_tag().map(String::from);

        Ok(PutOutcome {
            location: self.object_url(bucket, key),
            etag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> S3Settings {
        S3Settings {
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket: "assets".to_string(),
            endpoint: "http://localhost:9000/".to_string(),
            path: "uploads".to_string(),
            region: "us-east-1".to_string(),
            url_prefix: String::new(),
        }
    }

    #[test]
    fn test_object_url_is_path_style() {
        // Trailing slash on the endpoint is trimmed at construction.
        let store = S3Store::new(&settings());
        assert_eq!(
            store.object_url("assets", "uploads/photo.png"),
            Some("http://localhost:9000/assets/uploads/photo.png".to_string())
        );

        let mut s = settings();
        s.endpoint = "https://nyc3.digitaloceanspaces.com".to_string();
        let store = S3Store::new(&s);
        assert_eq!(
            store.object_url("assets", "photo.png"),
            Some("https://nyc3.digitaloceanspaces.com/assets/photo.png".to_string())
        );
    }

    #[test]
    fn test_object_url_without_endpoint_is_none() {
        let mut s = settings();
        s.endpoint = String::new();
        let store = S3Store::new(&s);
        assert_eq!(store.object_url("assets", "photo.png"), None);
    }

    #[test]
    fn test_construction_makes_no_requests() {
        // Endpoint does not resolve; building the client must still work.
        let mut s = settings();
        s.endpoint = "http://storage.invalid:9000".to_string();
        let _ = S3Store::new(&s);
    }
}
