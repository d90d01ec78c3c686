//! Publink
//!
//! A thin client for S3-compatible object storage (MinIO, Cloudflare R2,
//! AWS S3, DigitalOcean Spaces) that does exactly one job: push a byte
//! stream into a bucket and hand back a publicly reachable URL for it.
//!
//! All transfer mechanics (signing, retries, single-shot vs. multipart)
//! are delegated to the AWS SDK. This crate only wires the SDK client to a
//! custom endpoint with static credentials and decides what link to return:
//! a configured URL prefix when one is set, otherwise the object URL the
//! store is reachable under.
//!
//! ```no_run
//! use publink::{S3Settings, StorageClient};
//!
//! # async fn run() -> Result<(), publink::StorageError> {
//! let settings = S3Settings {
//!     access_key: "minioadmin".into(),
//!     secret_key: "minioadmin".into(),
//!     bucket: "assets".into(),
//!     endpoint: "http://localhost:9000".into(),
//!     path: "uploads".into(),
//!     region: "us-east-1".into(),
//!     url_prefix: String::new(),
//! };
//!
//! let client = StorageClient::new(settings);
//! let link = client
//!     .upload("photo.png", "image/png", b"not really a png".to_vec())
//!     .await?;
//! println!("{link}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod storage;

pub use crate::config::{S3Settings, Settings};
pub use crate::storage::{BoxError, ObjectStore, PutOutcome, S3Store, StorageClient, StorageError};
