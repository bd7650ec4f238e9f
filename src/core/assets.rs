//=========================================================================
// Asset Sources
//=========================================================================
//
// Raw byte access to packaged assets.
//
// The runtime does not decode anything; it hands the application the
// bytes behind a path. Hosts with a platform asset store implement
// `AssetSource`; `FsAssets` covers desktop and test hosts.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::trace;

//=== Internal Dependencies ===============================================

use super::error::AssetError;

//=== AssetSource =========================================================

/// Read-only asset store.
pub trait AssetSource: Send + Sync + 'static {
    /// Reads the whole asset at `path`.
    fn read(&self, path: &Path) -> Result<Vec<u8>, AssetError>;
}

//=== FsAssets ============================================================

/// Filesystem asset store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsAssets {
    root: PathBuf,
}

impl FsAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for FsAssets {
    /// Assets next to the working directory, in `assets/`.
    fn default() -> Self {
        Self::new("assets")
    }
}

impl AssetSource for FsAssets {
    fn read(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
        let full = self.root.join(path);
        trace!(target: "runtime", "Reading asset {}", full.display());

        fs::read(&full).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => AssetError::NotFound(path.to_path_buf()),
            _ => AssetError::Io {
                path: path.to_path_buf(),
                source,
            },
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
