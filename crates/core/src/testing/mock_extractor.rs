//! Mock extraction engine for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::extractor::{ExtractionResult, Extractor, ExtractorError, MediaProbe};
use crate::sanitize::sanitize_filename;

/// Mock implementation of the Extractor trait.
///
/// Probe metadata is configurable, probe and fetch can each be made to
/// fail once, and call counts are recorded for assertions. `fetch`
/// writes a real file into the staging directory so upload paths can
/// read it back.
pub struct MockExtractor {
    probe: Arc<RwLock<MediaProbe>>,
    next_probe_error: Arc<RwLock<Option<ExtractorError>>>,
    next_fetch_error: Arc<RwLock<Option<ExtractorError>>>,
    probe_calls: Arc<RwLock<u32>>,
    fetch_calls: Arc<RwLock<u32>>,
    last_staged: Arc<RwLock<Option<PathBuf>>>,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtractor {
    pub fn new() -> Self {
        Self {
            probe: Arc::new(RwLock::new(MediaProbe {
                title: "My Clip".to_string(),
                extension: "mp4".to_string(),
                filesize: None,
            })),
            next_probe_error: Arc::new(RwLock::new(None)),
            next_fetch_error: Arc::new(RwLock::new(None)),
            probe_calls: Arc::new(RwLock::new(0)),
            fetch_calls: Arc::new(RwLock::new(0)),
            last_staged: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the media that probe and fetch will report.
    pub async fn set_media(&self, title: &str, extension: &str) {
        let mut probe = self.probe.write().await;
        probe.title = title.to_string();
        probe.extension = extension.to_string();
    }

    /// Set the size probe will report; `None` means the source omits it.
    pub async fn set_filesize(&self, filesize: Option<u64>) {
        self.probe.write().await.filesize = filesize;
    }

    /// Configure the next probe call to fail with the given error.
    pub async fn set_probe_error(&self, error: ExtractorError) {
        *self.next_probe_error.write().await = Some(error);
    }

    /// Configure the next fetch call to fail with the given error.
    pub async fn set_fetch_error(&self, error: ExtractorError) {
        *self.next_fetch_error.write().await = Some(error);
    }

    pub async fn probe_count(&self) -> u32 {
        *self.probe_calls.read().await
    }

    pub async fn fetch_count(&self) -> u32 {
        *self.fetch_calls.read().await
    }

    /// Path of the file the most recent fetch wrote, if any.
    pub async fn last_staged_file(&self) -> Option<PathBuf> {
        self.last_staged.read().await.clone()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, _url: &str) -> Result<MediaProbe, ExtractorError> {
        *self.probe_calls.write().await += 1;
        if let Some(err) = self.next_probe_error.write().await.take() {
            return Err(err);
        }
        Ok(self.probe.read().await.clone())
    }

    async fn fetch(
        &self,
        _url: &str,
        staging_dir: &Path,
    ) -> Result<ExtractionResult, ExtractorError> {
        *self.fetch_calls.write().await += 1;
        if let Some(err) = self.next_fetch_error.write().await.take() {
            return Err(err);
        }

        let probe = self.probe.read().await.clone();
        let filename = sanitize_filename(&format!("{}.{}", probe.title, probe.extension));
        let local_path = staging_dir.join(filename);
        tokio::fs::write(&local_path, b"mock media bytes")
            .await
            .map_err(|e| ExtractorError::Internal(e.to_string()))?;
        *self.last_staged.write().await = Some(local_path.clone());

        Ok(ExtractionResult {
            title: probe.title,
            extension: probe.extension,
            local_path,
        })
    }
}
