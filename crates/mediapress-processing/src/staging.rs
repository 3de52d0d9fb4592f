//! Transient file staging
//!
//! Codecs that only speak filesystem paths (ffmpeg) get their input staged
//! here and their output read back from a reserved path. Staged files are
//! named uniquely, timestamped, and removed on drop, so a conversion that
//! errors or panics mid-flight still leaves the staging directory clean.
//! Callers should still call [`unstage`] on the happy path so removal
//! failures get logged instead of silently ignored.

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// A file staged for an external tool. Removed from disk when dropped.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
    created_at: DateTime<Utc>,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// When this file was staged.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Stage upload data in the system temp directory.
pub async fn stage(data: &[u8]) -> io::Result<StagedFile> {
    stage_in(std::env::temp_dir(), data).await
}

/// Stage upload data in a specific directory.
pub async fn stage_in(dir: impl AsRef<Path>, data: &[u8]) -> io::Result<StagedFile> {
    let file = tempfile::Builder::new()
        .prefix("mediapress-in-")
        .tempfile_in(dir)?;
    tokio::fs::write(file.path(), data).await?;

    let staged = StagedFile {
        file,
        created_at: Utc::now(),
    };
    tracing::debug!(
        path = %staged.path().display(),
        bytes = data.len(),
        "Staged input file"
    );
    Ok(staged)
}

/// Reserve an empty output path with the given suffix (e.g. ".mp4") in the
/// system temp directory.
pub fn reserve(suffix: &str) -> io::Result<StagedFile> {
    reserve_in(std::env::temp_dir(), suffix)
}

/// Reserve an empty output path in a specific directory.
pub fn reserve_in(dir: impl AsRef<Path>, suffix: &str) -> io::Result<StagedFile> {
    let file = tempfile::Builder::new()
        .prefix("mediapress-out-")
        .suffix(suffix)
        .tempfile_in(dir)?;

    let staged = StagedFile {
        file,
        created_at: Utc::now(),
    };
    tracing::debug!(path = %staged.path().display(), "Reserved output file");
    Ok(staged)
}

/// Remove a staged file now, logging instead of failing if removal errors.
pub fn unstage(staged: StagedFile) {
    let path = staged.path().to_path_buf();
    match staged.file.close() {
        Ok(()) => tracing::debug!(path = %path.display(), "Unstaged file"),
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove staged file"
        ),
    }
}
