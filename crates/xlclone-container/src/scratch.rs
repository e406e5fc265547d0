//! Scratch-directory management
//!
//! Strategies stage their work under fixed paths in the system temp
//! directory, not fresh random ones: a later run must be able to clean up
//! after an earlier run that died mid-way.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// A scratch directory at a fixed path, emptied on acquisition and removed
/// on drop.
///
/// Acquiring deletes whatever is already at the path first, so stale state
/// from an aborted earlier run never leaks into this one. Drop removal is
/// best effort; call [`close`](ScratchDir::close) to observe removal errors.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Delete anything at `path`, then create it fresh and empty.
    pub fn fresh(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if path.exists() {
            debug!(path = %path.display(), "removing stale scratch directory");
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir_all(&path)?;
        Ok(ScratchDir { path })
    }

    /// The scratch directory's path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now, reporting any error.
    pub fn close(self) -> io::Result<()> {
        let path = self.path.clone();
        std::mem::forget(self);
        fs::remove_dir_all(path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Recursively copy the tree at `src` into `dest`.
///
/// `dest` need not exist; existing files in it are overwritten. Symlinks
/// are followed as files, matching how packages are laid out on disk.
pub fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
