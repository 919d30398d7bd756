use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::IoError;

/// A path broken into the components used throughout the crate.
///
/// Windows-style backslashes are converted to forward slashes, as the
/// FluoView project files store tile names like `Slide1sec001\Slide1sec001.oif`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoragePath {
    /// The path exactly as given
    pub orig: String,

    /// Normalized full path
    pub full: PathBuf,

    /// Directory containing the file (or the path itself if it names a directory)
    pub path: PathBuf,

    /// Name of the containing directory
    pub dname: String,

    /// File name, empty if the path names a directory
    pub fname: String,

    /// File extension including the leading dot, empty if there is none
    pub ext: String,
}

impl StoragePath {
    /// Parse a path string.
    pub fn parse(orig: &str) -> Self {
        let normalized = orig.replace('\\', "/");
        let full = PathBuf::from(&normalized);

        let (path, fname) = if normalized.ends_with('/') || normalized.is_empty() {
            (full.clone(), String::new())
        } else {
            let fname = full
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let parent = full.parent().map(Path::to_path_buf).unwrap_or_default();
            (parent, fname)
        };

        let dname = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let ext = match fname.rfind('.') {
            Some(pos) if pos > 0 => fname[pos..].to_string(),
            _ => String::new(),
        };

        StoragePath {
            orig: orig.to_string(),
            full,
            path,
            dname,
            fname,
            ext,
        }
    }

    /// Parse a path given as `Path`.
    pub fn from_path(path: &Path) -> Self {
        Self::parse(&path.to_string_lossy())
    }

    /// Resolve a (possibly backslash-separated) name relative to this path's directory.
    pub fn join(&self, name: &str) -> Self {
        let name = name.replace('\\', "/");
        Self::from_path(&self.path.join(name))
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        &self.fname[..self.fname.len() - self.ext.len()]
    }

    /// Whether the file exists on disk.
    pub fn exists(&self) -> bool {
        self.full.exists()
    }
}

/// Fix the broken file names found in FluoView experiment files.
///
/// FluoView usually stores tile names without their numeric suffix, e.g.
/// `Slide1sec001\Slide1sec001.oib` where the file on disk is actually
/// `Slide1sec001\Slide1sec001_01.oib`. If the given path does not exist the
/// `_01` suffix is tried before failing.
pub fn validate_filepath(storage: &StoragePath) -> Result<StoragePath, IoError> {
    debug!("Validating file path: {}", storage.full.display());
    if storage.exists() {
        return Ok(storage.clone());
    }

    let fixed_name = format!("{}_01{}", storage.stem(), storage.ext);
    let fixed = StoragePath::from_path(&storage.path.join(fixed_name));
    debug!("Trying next path: {}", fixed.full.display());
    if fixed.exists() {
        return Ok(fixed);
    }

    Err(IoError::NotFound(storage.full.display().to_string()))
}

/// Resolve `path` against the current working directory.
///
/// Unlike `canonicalize`, the path does not need to exist and symlinks are
/// kept. An empty path resolves to the working directory itself.
pub fn absolute_path(path: &Path) -> Result<PathBuf, IoError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| IoError::read(".", &e))?;
    Ok(cwd.join(path).components().collect())
}
