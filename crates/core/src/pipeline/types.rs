//! Types for pipeline runs.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Terminal failure classification for one pipeline run.
///
/// Every failure inside the pipeline is converted to exactly one of
/// these before reaching the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No source URL was provided.
    #[error("No URL provided")]
    MissingInput,

    /// The source reported a size over the configured limit.
    #[error("Source exceeds the {limit_bytes} byte limit")]
    TooLarge { limit_bytes: u64 },

    /// The source is unreachable, unsupported or removed.
    /// Diagnostics stay internal; user-facing messages are generic.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Extraction reported success but left no file on disk.
    #[error("Downloaded file missing from staging area")]
    StagedFileMissing,

    /// The object store was disabled at startup.
    #[error("Object store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Upload succeeded but no link could be issued.
    #[error("Link generation failed: {0}")]
    LinkFailed(String),

    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl PipelineError {
    /// Client-attributable failures (map to 4xx at the HTTP surface).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingInput
                | PipelineError::TooLarge { .. }
                | PipelineError::SourceUnavailable(_)
        )
    }

    /// Stable label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            PipelineError::MissingInput => "missing_input",
            PipelineError::TooLarge { .. } => "too_large",
            PipelineError::SourceUnavailable(_) => "source_unavailable",
            PipelineError::StagedFileMissing => "staged_file_missing",
            PipelineError::StoreUnavailable(_) => "store_unavailable",
            PipelineError::UploadFailed(_) => "upload_failed",
            PipelineError::LinkFailed(_) => "link_failed",
            PipelineError::Unexpected(_) => "unexpected",
        }
    }
}

/// Successful pipeline output: a link plus the source title.
#[derive(Debug, Clone)]
pub struct PublishedDownload {
    pub url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(PipelineError::MissingInput.is_client_error());
        assert!(PipelineError::TooLarge { limit_bytes: 1 }.is_client_error());
        assert!(PipelineError::SourceUnavailable("gone".into()).is_client_error());

        assert!(!PipelineError::StagedFileMissing.is_client_error());
        assert!(!PipelineError::StoreUnavailable("down".into()).is_client_error());
        assert!(!PipelineError::UploadFailed("io".into()).is_client_error());
        assert!(!PipelineError::LinkFailed("sign".into()).is_client_error());
        assert!(!PipelineError::Unexpected("?".into()).is_client_error());
    }

    #[test]
    fn test_outcome_labels_are_distinct() {
        let errors = [
            PipelineError::MissingInput,
            PipelineError::TooLarge { limit_bytes: 1 },
            PipelineError::SourceUnavailable(String::new()),
            PipelineError::StagedFileMissing,
            PipelineError::StoreUnavailable(String::new()),
            PipelineError::UploadFailed(String::new()),
            PipelineError::LinkFailed(String::new()),
            PipelineError::Unexpected(String::new()),
        ];
        let mut labels: Vec<_> = errors.iter().map(|e| e.outcome()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), errors.len());
    }
}
