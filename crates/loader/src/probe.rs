//! Filesystem checks behind discovery.

use crate::error::LoaderError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Existence checks and shallow listings. Implemented by [`FsProbe`]; tests may fake it.
pub trait ArtifactProbe {
    /// Whether `path` exists. A path that cannot be checked is not absent.
    ///
    /// # Errors
    /// [`LoaderError::UnreadablePath`] when the existence of `path` cannot be determined.
    fn exists(&self, path: &Path) -> Result<bool, LoaderError>;

    /// Immediate regular-file children of `dir`, sorted by file name.
    ///
    /// Dot-files and sub-directories are left out.
    ///
    /// # Errors
    /// [`LoaderError::UnreadablePath`] when `dir` exists but cannot be enumerated.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, LoaderError>;
}

/// [`ArtifactProbe`] over the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl ArtifactProbe for FsProbe {
    fn exists(&self, path: &Path) -> Result<bool, LoaderError> {
        path.try_exists().map_err(|err| LoaderError::unreadable(path, err))
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, LoaderError> {
        let metadata = std::fs::metadata(dir).map_err(|err| LoaderError::unreadable(dir, err))?;
        if !metadata.is_dir() {
            let source = std::io::Error::from(std::io::ErrorKind::NotADirectory);
            return Err(LoaderError::unreadable(dir, source));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(dir).to_path_buf();
                let source = err.into_io_error().unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                LoaderError::unreadable(path, source)
            })?;

            let hidden = entry.file_name().to_str().is_some_and(|name| name.starts_with('.'));
            if entry.file_type().is_file() && !hidden {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}
