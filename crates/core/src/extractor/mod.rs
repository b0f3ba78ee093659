//! Extraction engine abstraction.
//!
//! This module provides an `Extractor` trait for resolving a media
//! source URL into metadata and a downloaded file on disk, with a
//! yt-dlp subprocess backend.

mod types;
mod ytdlp;

pub use types::*;
pub use ytdlp::YtDlpExtractor;
