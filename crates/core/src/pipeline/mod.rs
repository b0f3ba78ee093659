//! Download-and-publish pipeline.
//!
//! Sequences one request end to end: size pre-check, staging,
//! extraction, upload, link issuance, with a retention sweep pre-pass.

mod runner;
mod types;

pub use runner::DownloadPipeline;
pub use types::{PipelineError, PublishedDownload};
