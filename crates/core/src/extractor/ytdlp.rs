//! yt-dlp subprocess backend for the `Extractor` trait.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::sanitize::sanitize_filename;

use super::types::{ExtractionResult, Extractor, ExtractorError, MediaProbe};

/// Format selector: best combined audio/video stream, preferring
/// resolution <=1080p and mp4 when equivalent options exist.
const FORMAT_SELECTOR: &str = "best[height<=1080][ext=mp4]/best[height<=1080]/best";

/// Extraction backend shelling out to the yt-dlp binary.
pub struct YtDlpExtractor {
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Run yt-dlp with the given arguments under the configured time bound.
    async fn run(&self, args: &[&str]) -> Result<Output, ExtractorError> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let result = tokio::time::timeout(
            timeout,
            Command::new(&self.config.ytdlp_bin)
                .args(args)
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match result {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(ExtractorError::Internal(format!(
                "failed to run {}: {}",
                self.config.ytdlp_bin, e
            ))),
            Err(_) => Err(ExtractorError::Timeout(self.config.timeout_secs)),
        }
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn probe(&self, url: &str) -> Result<MediaProbe, ExtractorError> {
        let output = self
            .run(&["--dump-single-json", "--no-download", "--no-warnings", url])
            .await?;

        if !output.status.success() {
            return Err(classify_failure(&output.stderr));
        }

        parse_probe(&output.stdout)
    }

    async fn fetch(
        &self,
        url: &str,
        staging_dir: &Path,
    ) -> Result<ExtractionResult, ExtractorError> {
        let template = format!("{}/%(title)s.%(ext)s", staging_dir.display());
        let output = self
            .run(&[
                "--format",
                FORMAT_SELECTOR,
                "--output",
                &template,
                "--restrict-filenames",
                "--no-progress",
                "--no-warnings",
                "--print-json",
                url,
            ])
            .await?;

        if !output.status.success() {
            return Err(classify_failure(&output.stderr));
        }

        let probe = parse_probe(&output.stdout)?;
        debug!(
            title = %probe.title,
            extension = %probe.extension,
            "yt-dlp download finished"
        );

        let local_path = resolve_staged_file(staging_dir, &probe.title, &probe.extension)?;

        Ok(ExtractionResult {
            title: probe.title,
            extension: probe.extension,
            local_path,
        })
    }
}

/// Parse the info JSON that yt-dlp prints for a source.
fn parse_probe(stdout: &[u8]) -> Result<MediaProbe, ExtractorError> {
    let info: serde_json::Value = serde_json::from_slice(stdout)
        .map_err(|e| ExtractorError::InvalidMetadata(e.to_string()))?;

    let title = info
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or("video")
        .to_string();
    let extension = info
        .get("ext")
        .and_then(|v| v.as_str())
        .unwrap_or("mp4")
        .to_string();
    // Sources that omit filesize often still report an approximation.
    let filesize = info
        .get("filesize")
        .and_then(|v| v.as_u64())
        .or_else(|| info.get("filesize_approx").and_then(|v| v.as_u64()));

    Ok(MediaProbe {
        title,
        extension,
        filesize,
    })
}

/// Locate the downloaded file inside the staging directory.
///
/// The engine escapes filenames with its own rules, which do not
/// always match ours. Try the sanitized name first, then fall back to
/// the single staged file if there is exactly one. Anything else is a
/// template/path mismatch.
fn resolve_staged_file(
    staging_dir: &Path,
    title: &str,
    extension: &str,
) -> Result<PathBuf, ExtractorError> {
    let expected = staging_dir.join(sanitize_filename(&format!("{}.{}", title, extension)));
    if expected.is_file() {
        return Ok(expected);
    }

    let files: Vec<PathBuf> = std::fs::read_dir(staging_dir)
        .map_err(|e| ExtractorError::Internal(e.to_string()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    match files.as_slice() {
        [single] => {
            warn!(
                expected = %expected.display(),
                actual = %single.display(),
                "staged file name did not match sanitized title"
            );
            Ok(single.clone())
        }
        _ => Err(ExtractorError::StagedFileMissing(expected)),
    }
}

/// Classify a non-zero engine exit from its stderr.
///
/// yt-dlp reports source-side failures (unreachable, removed,
/// unsupported URL, geo-blocked) as `ERROR:` lines. Anything else on
/// stderr means the engine itself broke (missing ffmpeg, disk full, a
/// crash traceback) and must not be blamed on the source.
fn classify_failure(stderr: &[u8]) -> ExtractorError {
    let text = String::from_utf8_lossy(stderr);
    if let Some(line) = text
        .lines()
        .rev()
        .find(|line| line.trim_start().starts_with("ERROR:"))
    {
        return ExtractorError::SourceUnavailable(line.trim().to_string());
    }
    ExtractorError::Internal(stderr_summary(stderr))
}

/// Last stderr line, trimmed, for diagnostics.
fn stderr_summary(stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("extraction engine exited with an error")
        .trim()
        .to_string()
}
