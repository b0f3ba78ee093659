//! Types for extraction engine operations.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during extraction engine operations.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// The source is unreachable, unsupported or removed.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// The engine reported success but the file is absent from disk.
    #[error("Staged file missing: {0}")]
    StagedFileMissing(PathBuf),

    /// The extraction run exceeded its configured time bound.
    #[error("Extraction timed out after {0}s")]
    Timeout(u64),

    /// The engine produced metadata we could not parse.
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Any other failure; message preserved for diagnostics only.
    #[error("Extractor failure: {0}")]
    Internal(String),
}

/// Metadata-only view of a source, no download performed.
#[derive(Debug, Clone)]
pub struct MediaProbe {
    pub title: String,
    pub extension: String,
    /// Reported size in bytes. Many sources omit this.
    pub filesize: Option<u64>,
}

/// A completed extraction: metadata plus the staged file.
///
/// The local file lives inside a staging area and is deleted with it.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub title: String,
    pub extension: String,
    pub local_path: PathBuf,
}

/// Trait for extraction engine backends.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Query source metadata without downloading anything.
    async fn probe(&self, url: &str) -> Result<MediaProbe, ExtractorError>;

    /// Download the source into `staging_dir` and return the result.
    async fn fetch(
        &self,
        url: &str,
        staging_dir: &Path,
    ) -> Result<ExtractionResult, ExtractorError>;
}
