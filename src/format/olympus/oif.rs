use tracing::{debug, info};

use crate::dataset::Dimensions;
use crate::error::FormatError;
use crate::format::detect::{check_magic, ImageFormat};
use crate::format::ini::IniDocument;
use crate::io::{decode_utf16, read_file, StoragePath};

use super::{dimensions_from_ini, MetadataReader};

/// Reader for Olympus `.oif` files.
///
/// OIF files are UTF-16 encoded INI documents; the pixel data lives in a
/// separate `.oif.files` directory and is not touched.
#[derive(Debug, Clone)]
pub struct OifReader {
    storage: StoragePath,
    ini: IniDocument,
    dimensions: Dimensions,
}

impl OifReader {
    /// Open and parse an OIF file.
    pub fn open(storage: &StoragePath) -> Result<Self, FormatError> {
        info!("Parsing OIF file: {}", storage.full.display());
        let bytes = read_file(&storage.full)?;
        Self::from_bytes(storage.clone(), &bytes)
    }

    /// Parse OIF content that has already been read into memory.
    pub fn from_bytes(storage: StoragePath, bytes: &[u8]) -> Result<Self, FormatError> {
        let source = storage.full.display().to_string();
        check_magic(ImageFormat::Oif, bytes, &source);

        let text = decode_utf16(bytes)?;
        let ini = IniDocument::parse(&text)?;
        debug!("Finished parsing OIF file.");

        let dimensions = dimensions_from_ini(&ini, &source)?;
        Ok(OifReader {
            storage,
            ini,
            dimensions,
        })
    }

    /// The parsed INI description.
    pub fn ini(&self) -> &IniDocument {
        &self.ini
    }
}

impl MetadataReader for OifReader {
    fn format(&self) -> ImageFormat {
        ImageFormat::Oif
    }

    fn storage(&self) -> &StoragePath {
        &self.storage
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
}
