//! Crash-safe file writes
//!
//! Content is written to a temporary file next to the target and renamed over
//! it, so readers only ever observe the old file or the complete new one.

use crate::error::{FleetError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomic write-temp/rename file store
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicFileStore;

impl AtomicFileStore {
    /// Write `bytes` to `path` atomically
    pub fn save(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
        Self::stage(path, bytes)?.commit()
    }

    /// Write `bytes` to a temporary file beside `path` without touching `path`.
    ///
    /// The returned [`StagedWrite`] must be committed to replace the target;
    /// dropping it discards the temporary file.
    pub fn stage(path: impl AsRef<Path>, bytes: &[u8]) -> Result<StagedWrite> {
        let target = path.as_ref().to_path_buf();
        let dir = parent_dir(&target);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            tracing::debug!(dir = %dir.display(), "Created registry directory");
        }

        let prefix = format!(
            ".{}.",
            target
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
        let mut temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(&dir)?;

        temp.write_all(bytes)?;
        temp.flush()?;
        temp.as_file().sync_all()?;

        Ok(StagedWrite { temp, target })
    }

    /// Read the whole file; a missing file is reported as `NotFound`
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = path.as_ref();
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FleetError::NotFound(path.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// A fully written temporary file waiting to replace its target
#[derive(Debug)]
pub struct StagedWrite {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedWrite {
    /// Path of the temporary file
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Rename the temporary file over the target
    pub fn commit(self) -> Result<()> {
        let target = self.target;
        self.temp
            .persist(&target)
            .map_err(|e| FleetError::Io(e.error))?;
        sync_dir(&parent_dir(&target));
        tracing::debug!(path = %target.display(), "Committed atomic write");
        Ok(())
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Make the rename itself durable. Best effort: not every platform or
/// filesystem allows syncing a directory.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        tracing::debug!(dir = %dir.display(), error = %e, "Directory sync failed");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
