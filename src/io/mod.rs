//! File system helpers shared by the format readers.
//!
//! - [`StoragePath`] splits a path into the pieces the readers and the
//!   macro generator need (directory, directory name, file name, extension).
//! - [`validate_filepath`] repairs the tile file names FluoView writes.
//! - [`decode_utf16`] decodes the UTF-16 text used by OIF/OIB metadata.

mod path;
mod text;

use std::path::Path;

use crate::error::IoError;

pub use path::{absolute_path, validate_filepath, StoragePath};
pub use text::{decode_utf16, has_utf16_bom, read_u16_be, read_u16_le};

/// Read a whole file into memory.
pub fn read_file(path: &Path) -> Result<Vec<u8>, IoError> {
    std::fs::read(path).map_err(|e| IoError::read(path.display().to_string(), &e))
}

/// Read a whole file as UTF-8 text.
pub fn read_to_string(path: &Path) -> Result<String, IoError> {
    let bytes = read_file(path)?;
    String::from_utf8(bytes).map_err(|e| {
        IoError::Decode(format!("{} is not valid UTF-8: {}", path.display(), e))
    })
}

/// Write text to a file, creating or truncating it.
pub fn write_file(path: &Path, contents: &str) -> Result<(), IoError> {
    std::fs::write(path, contents).map_err(|e| IoError::write(path.display().to_string(), &e))
}
