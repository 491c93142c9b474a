//! Working directory ownership for a single probe.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Removes the directory it guards when dropped, whatever happened in
/// between.
#[derive(Debug)]
pub struct WorkDirGuard {
    path: PathBuf,
}

impl WorkDirGuard {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkDirGuard {
    fn drop(&mut self) {
        erase_dir(&self.path);
    }
}

/// Recursively delete `path`, ignoring every error (including the directory
/// already being gone).
pub fn erase_dir(path: &Path) {
    if let Err(e) = fs::remove_dir_all(path) {
        debug!("Ignoring cleanup failure for {}: {}", path.display(), e);
    }
}
