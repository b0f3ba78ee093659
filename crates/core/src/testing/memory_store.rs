//! In-memory object store for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::storage::{DownloadLink, ObjectStore, StoreError};

/// Mock implementation of the ObjectStore trait.
///
/// Keeps objects in a sorted map and supports per-operation,
/// single-shot error injection: a configured error fails the next
/// matching call and is then consumed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    next_upload_error: Arc<RwLock<Option<StoreError>>>,
    next_link_error: Arc<RwLock<Option<StoreError>>>,
    next_list_error: Arc<RwLock<Option<StoreError>>>,
    next_delete_error: Arc<RwLock<Option<StoreError>>>,
    next_get_error: Arc<RwLock<Option<StoreError>>>,
    next_put_error: Arc<RwLock<Option<StoreError>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an object directly, bypassing upload accounting.
    pub async fn insert_object(&self, key: &str, data: Vec<u8>) {
        self.objects.write().await.insert(key.to_string(), data);
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }

    pub async fn set_upload_error(&self, error: StoreError) {
        *self.next_upload_error.write().await = Some(error);
    }

    pub async fn set_link_error(&self, error: StoreError) {
        *self.next_link_error.write().await = Some(error);
    }

    pub async fn set_list_error(&self, error: StoreError) {
        *self.next_list_error.write().await = Some(error);
    }

    pub async fn set_delete_error(&self, error: StoreError) {
        *self.next_delete_error.write().await = Some(error);
    }

    pub async fn set_get_error(&self, error: StoreError) {
        *self.next_get_error.write().await = Some(error);
    }

    pub async fn set_put_error(&self, error: StoreError) {
        *self.next_put_error.write().await = Some(error);
    }

    async fn take_error(slot: &RwLock<Option<StoreError>>) -> Option<StoreError> {
        slot.write().await.take()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn upload_file(&self, local_path: &Path, key: &str) -> Result<(), StoreError> {
        if let Some(err) = Self::take_error(&self.next_upload_error).await {
            return Err(err);
        }
        let data = tokio::fs::read(local_path)
            .await
            .map_err(|e| StoreError::UploadFailed(format!("{}: {}", local_path.display(), e)))?;
        self.objects.write().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn link(&self, key: &str, ttl: Duration) -> Result<DownloadLink, StoreError> {
        if let Some(err) = Self::take_error(&self.next_link_error).await {
            return Err(err);
        }
        if !self.objects.read().await.contains_key(key) {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Ok(DownloadLink {
            url: format!("https://store.invalid/{}?sig=test", key),
            expires_at: Some(
                Utc::now() + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero()),
            ),
        })
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        if let Some(err) = Self::take_error(&self.next_list_error).await {
            return Err(err);
        }
        Ok(self
            .objects
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        if let Some(err) = Self::take_error(&self.next_delete_error).await {
            return Err(err);
        }
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        if let Some(err) = Self::take_error(&self.next_get_error).await {
            return Err(err);
        }
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), StoreError> {
        if let Some(err) = Self::take_error(&self.next_put_error).await {
            return Err(err);
        }
        self.objects.write().await.insert(key.to_string(), data);
        Ok(())
    }
}
