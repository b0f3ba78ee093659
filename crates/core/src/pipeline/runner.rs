//! Pipeline orchestrator: sequences one download request end to end.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::extractor::{Extractor, ExtractorError};
use crate::metrics::PIPELINE_RUNS_TOTAL;
use crate::retention;
use crate::sanitize::sanitize_filename;
use crate::staging::StagingArea;
use crate::storage::StoreHandle;

use super::types::{PipelineError, PublishedDownload};

/// Orchestrates one download-and-publish run per call.
///
/// Runs share nothing but the store handle; each owns its own staging
/// area, which is released on every exit path.
pub struct DownloadPipeline {
    extractor: Arc<dyn Extractor>,
    store: StoreHandle,
    config: PipelineConfig,
}

impl DownloadPipeline {
    pub fn new(extractor: Arc<dyn Extractor>, store: StoreHandle, config: PipelineConfig) -> Self {
        Self {
            extractor,
            store,
            config,
        }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Run the pipeline for a single source URL.
    pub async fn run(&self, url: &str) -> Result<PublishedDownload, PipelineError> {
        let result = self.run_inner(url).await;
        let outcome = match &result {
            Ok(_) => "complete",
            Err(e) => e.outcome(),
        };
        PIPELINE_RUNS_TOTAL.with_label_values(&[outcome]).inc();
        result
    }

    async fn run_inner(&self, url: &str) -> Result<PublishedDownload, PipelineError> {
        if url.trim().is_empty() {
            return Err(PipelineError::MissingInput);
        }

        // Report a disabled store before doing any work; no staging
        // dir, no extraction attempt.
        let store = self
            .store
            .get()
            .map_err(|e| PipelineError::StoreUnavailable(e.to_string()))?;

        // Retention pre-pass. Failures are absorbed inside sweep.
        retention::sweep(
            store.as_ref(),
            &self.config.key_prefix,
            self.config.retention_ttl_secs,
        )
        .await;

        // Size pre-check. Fails closed only on a confirmed-oversize
        // result; an unanswerable probe passes through (fail open).
        match self.extractor.probe(url).await {
            Ok(probe) => {
                if let Some(size) = probe.filesize {
                    if size > self.config.max_source_bytes {
                        info!(url = %url, size, "rejecting oversized source");
                        return Err(PipelineError::TooLarge {
                            limit_bytes: self.config.max_source_bytes,
                        });
                    }
                }
            }
            Err(e) => {
                debug!(url = %url, error = %e, "size pre-check failed, proceeding with download");
            }
        }

        let staging = StagingArea::new()
            .map_err(|e| PipelineError::Unexpected(format!("staging area: {}", e)))?;

        let extraction = self
            .extractor
            .fetch(url, staging.path())
            .await
            .map_err(map_extractor_error)?;

        let filename = sanitize_filename(&format!(
            "{}.{}",
            extraction.title, extraction.extension
        ));
        let key = format!(
            "{}{}_{}",
            self.config.key_prefix,
            Utc::now().timestamp(),
            filename
        );

        store
            .upload_file(&extraction.local_path, &key)
            .await
            .map_err(|e| PipelineError::UploadFailed(e.to_string()))?;

        // Link issuance is fallible independently of the upload. On
        // failure the freshly stored object has no link anyone could
        // ever use, so remove it rather than orphaning it until the
        // next sweep.
        let ttl = Duration::from_secs(self.config.link_ttl_secs);
        let link = match store.link(&key, ttl).await {
            Ok(link) => link,
            Err(e) => {
                warn!(key = %key, error = %e, "link issuance failed after upload");
                if let Err(del) = store.delete(&key).await {
                    warn!(key = %key, error = %del, "failed to remove orphaned object");
                }
                return Err(PipelineError::LinkFailed(e.to_string()));
            }
        };

        info!(key = %key, title = %extraction.title, "download published");

        Ok(PublishedDownload {
            url: link.url,
            expires_at: link.expires_at,
            title: extraction.title,
        })
        // staging dropped here; also dropped on every early return above
    }
}

fn map_extractor_error(e: ExtractorError) -> PipelineError {
    match e {
        ExtractorError::SourceUnavailable(msg) => PipelineError::SourceUnavailable(msg),
        ExtractorError::StagedFileMissing(_) => PipelineError::StagedFileMissing,
        ExtractorError::Timeout(secs) => {
            PipelineError::Unexpected(format!("extraction timed out after {}s", secs))
        }
        ExtractorError::InvalidMetadata(msg) | ExtractorError::Internal(msg) => {
            PipelineError::Unexpected(msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_extractor_errors() {
        assert!(matches!(
            map_extractor_error(ExtractorError::SourceUnavailable("gone".into())),
            PipelineError::SourceUnavailable(_)
        ));
        assert!(matches!(
            map_extractor_error(ExtractorError::StagedFileMissing("/tmp/x".into())),
            PipelineError::StagedFileMissing
        ));
        assert!(matches!(
            map_extractor_error(ExtractorError::Timeout(600)),
            PipelineError::Unexpected(_)
        ));
        assert!(matches!(
            map_extractor_error(ExtractorError::Internal("boom".into())),
            PipelineError::Unexpected(_)
        ));
    }
}
