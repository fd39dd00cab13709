//! Registry file management
//!
//! Binds the registry codec to a file path and the atomic write protocol.

use crate::atomic::AtomicFileStore;
use crate::codec;
use crate::error::{FleetError, Result};
use crate::fleet::Fleet;
use std::path::{Path, PathBuf};

/// Reads and writes the fleet registry file
#[derive(Debug, Clone)]
pub struct FleetStore {
    path: PathBuf,
}

impl FleetStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry. A missing file is reported as `NotFound`.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Fleet> {
        let bytes = AtomicFileStore::load(&self.path)?;
        let fleet = codec::decode(&bytes)?;
        tracing::debug!(hosts = fleet.len(), "Loaded fleet registry");
        Ok(fleet)
    }

    /// Load the registry, starting from an empty one if the file does not exist.
    /// Corrupt files are still an error.
    pub fn load_or_default(&self) -> Result<Fleet> {
        match self.load() {
            Err(FleetError::NotFound(path)) => {
                tracing::info!(path = %path.display(), "Registry file not found, starting empty");
                Ok(Fleet::new())
            }
            other => other,
        }
    }

    /// Persist the registry atomically
    #[tracing::instrument(skip(self, fleet), fields(path = %self.path.display()))]
    pub fn save(&self, fleet: &Fleet) -> Result<()> {
        let bytes = codec::encode(fleet)?;
        AtomicFileStore::save(&self.path, &bytes)?;
        tracing::debug!(hosts = fleet.len(), "Saved fleet registry");
        Ok(())
    }
}
