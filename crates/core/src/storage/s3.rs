//! S3 backend for the `ObjectStore` trait.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::Utc;
use futures::TryStreamExt;
use tracing::info;

use crate::config::StorageConfig;

use super::types::{DownloadLink, ObjectStore, StoreError};

/// S3 object store.
///
/// Construction probes the bucket; a handle is only produced when the
/// store is reachable and the bucket exists. Callers wrap the failure
/// in `StoreHandle::Disabled` rather than aborting startup.
#[derive(Clone, Debug)]
pub struct S3Store {
    client: Client,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
    public_links: bool,
}

impl S3Store {
    /// Build the client and verify the bucket exists.
    pub async fn connect(config: &StorageConfig) -> Result<Self, StoreError> {
        let region_provider =
            RegionProviderChain::first_try(aws_config::Region::new(config.region.clone()));

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        // S3-compatible providers (MinIO, Spaces) need path-style addressing.
        let client = if let Some(ref endpoint) = config.endpoint_url {
            let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint)
                .force_path_style(true);
            if let Some(region) = sdk_config.region().cloned() {
                builder = builder.region(region);
            }
            Client::from_conf(builder.build())
        } else {
            Client::new(&sdk_config)
        };

        client
            .head_bucket()
            .bucket(&config.bucket)
            .send()
            .await
            .map_err(|e| {
                StoreError::Unavailable(format!("bucket {} not reachable: {}", config.bucket, e))
            })?;

        info!(bucket = %config.bucket, region = %config.region, "S3 store connected");

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint_url: config.endpoint_url.clone(),
            public_links: config.public_links,
        })
    }

    /// Deterministic public URL for a key in this bucket.
    fn public_url(&self, key: &str) -> String {
        match &self.endpoint_url {
            Some(endpoint) => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            }
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn name(&self) -> &str {
        "s3"
    }

    async fn upload_file(&self, local_path: &Path, key: &str) -> Result<(), StoreError> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StoreError::UploadFailed(e.to_string()))?;

        let start = std::time::Instant::now();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "S3 upload failed"
                );
                StoreError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );
        Ok(())
    }

    async fn link(&self, key: &str, ttl: Duration) -> Result<DownloadLink, StoreError> {
        if self.public_links {
            return Ok(DownloadLink {
                url: self.public_url(key),
                expires_at: None,
            });
        }

        let presigning_config = aws_sdk_s3::presigning::PresigningConfig::builder()
            .expires_in(ttl)
            .build()
            .map_err(|e| StoreError::LinkFailed(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| StoreError::LinkFailed(e.to_string()))?;

        Ok(DownloadLink {
            url: presigned.uri().to_string(),
            expires_at: Some(
                Utc::now() + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero()),
            ),
        })
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        while let Some(page) = pages
            .try_next()
            .await
            .map_err(|e| StoreError::ListFailed(e.to_string()))?
        {
            for object in page.contents() {
                if let Some(key) = object.key() {
                    keys.push(key.to_string());
                }
            }
        }

        Ok(keys)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        // S3 delete_object on a missing key succeeds, which matches
        // the harmless-not-found semantics we want for sweeps.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::DeleteFailed(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    GetObjectError::NoSuchKey(_) => StoreError::NotFound(key.to_string()),
                    _ => StoreError::ReadFailed(e.to_string()),
                },
                _ => StoreError::ReadFailed(e.to_string()),
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        Ok(data.into_bytes().to_vec())
    }

    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }
}
