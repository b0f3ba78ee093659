//! Scoped staging directory for one in-flight download.

use std::io;
use std::path::Path;

use tempfile::TempDir;

/// A private, empty, writable directory bounding the lifetime of a
/// locally downloaded file.
///
/// The directory and everything in it are removed recursively when the
/// value is dropped, which covers every exit path of a pipeline run.
/// Each run owns its own staging area; none are shared.
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a fresh staging directory under the system temp root.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("grabdock-").tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
