//! Local record of which tracks are already downloaded.
//!
//! A file existing at a track's save path is the success marker: downloads
//! only ever create that file by renaming a fully written partial file onto
//! it. Content is not verified.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::manifest::Track;

/// Decides where tracks are saved and whether they need downloading.
pub trait DownloadStore: Debug + Send + Sync {
    /// Creates whatever backing storage the store needs.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if the storage cannot be created.
    fn prepare(&self) -> std::io::Result<()>;

    /// Directory tracks are saved into.
    fn root(&self) -> &Path;

    /// Path the track's media is written to.
    fn save_path(&self, track: &Track) -> PathBuf {
        track.save_path(self.root())
    }

    /// Whether the track was completed by an earlier download.
    fn is_already_downloaded(&self, track: &Track) -> bool;
}

/// [`DownloadStore`] backed by one directory, keyed by derived file name.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Creates a store rooted at `root`. Nothing is touched on disk until
    /// [`prepare`](DownloadStore::prepare).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DownloadStore for DirectoryStore {
    fn prepare(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        debug!(path = %self.root.display(), "download directory ready");
        Ok(())
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn is_already_downloaded(&self, track: &Track) -> bool {
        let path = self.save_path(track);
        match path.try_exists() {
            Ok(exists) => exists,
            Err(e) => {
                // Only a definite "not found" schedules a download.
                warn!(path = %path.display(), error = %e, "cannot stat save path, skipping track");
                true
            }
        }
    }
}
