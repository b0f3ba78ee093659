//! Types for object store operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during object store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store was not reachable at startup; no I/O was attempted.
    #[error("Object store unavailable: {0}")]
    Unavailable(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Link issuance failed. Independent of upload success.
    #[error("Link generation failed: {0}")]
    LinkFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),
}

/// A time-limited (or stable public) retrieval link for a stored object.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadLink {
    pub url: String,
    /// Absent for stable public URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Trait for object store backends.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Transfer a local file's bytes to the store under `key`.
    async fn upload_file(&self, local_path: &Path, key: &str) -> Result<(), StoreError>;

    /// Issue a retrieval link for `key`, valid for at least `ttl`.
    async fn link(&self, key: &str, ttl: Duration) -> Result<DownloadLink, StoreError>;

    /// List all keys under `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Delete the object at `key`. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Read the full object at `key`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Write `data` to `key`, replacing any existing object.
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), StoreError>;
}
