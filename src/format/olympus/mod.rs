//! Readers for Olympus per-tile image metadata.
//!
//! # Formats
//!
//! - [`OifReader`]: `.oif` files, UTF-16 INI text
//! - [`OibReader`]: `.oib` files, an OLE2 container holding the same INI
//!   content as OIF files
//! - [`OirReader`]: `.oir` files (FluoView 3000), binary data with embedded
//!   XML property blocks
//!
//! All readers implement [`MetadataReader`], so callers can obtain
//! [`Dimensions`] without caring about the underlying format. Use
//! [`open_image`] to go from a path to a populated [`ImageData`].

mod oib;
mod oif;
mod oir;

use tracing::{debug, info, warn};

use crate::dataset::{DatasetType, Dimensions, ImageData, StorageType};
use crate::error::{FormatError, ParseError};
use crate::io::{validate_filepath, StoragePath};

use super::detect::{detect_image_format, ImageFormat};
use super::ini::IniDocument;

pub use oib::{OibReader, EXPECTED_OIB_VERSION, OIB_INFO_STREAM};
pub use oif::OifReader;
pub use oir::{
    is_printable, scan_xml_sections, OirReader, DEFAULT_MIN_LEN, FRAME_PROPERTIES_TAG,
    IMAGE_PROPERTIES_TAG, SCAN_CHUNK_SIZE,
};

// =============================================================================
// MetadataReader Trait
// =============================================================================

/// Format-agnostic access to the metadata of one image file.
pub trait MetadataReader {
    /// The format this reader handles.
    fn format(&self) -> ImageFormat;

    /// The file the metadata was read from.
    fn storage(&self) -> &StoragePath;

    /// Parsed image dimensions.
    fn dimensions(&self) -> Dimensions;
}

/// Open an Olympus image file and build an [`ImageData`] from its metadata.
///
/// The path is validated first, trying FluoView's `_01` suffix if the given
/// name doesn't exist (see [`validate_filepath`]).
pub fn open_image(path: &StoragePath) -> Result<ImageData, FormatError> {
    let storage = validate_filepath(path)?;
    let format = detect_image_format(&storage.full)?;
    debug!("Opening {} as {}", storage.full.display(), format.name());

    let reader: Box<dyn MetadataReader> = match format {
        ImageFormat::Oif => Box::new(OifReader::open(&storage)?),
        ImageFormat::Oib => Box::new(OibReader::open(&storage)?),
        ImageFormat::Oir => Box::new(OirReader::open(&storage)?),
    };

    let mut image = ImageData::new(DatasetType::Stack, StorageType::Tree, storage)?;
    image.format = Some(reader.format());
    image.dimensions = reader.dimensions();
    Ok(image)
}

// =============================================================================
// INI Dimensions (OIF / OIB)
// =============================================================================

const REFERENCE_IMAGE_SECTION: &str = "Reference Image Parameter";

/// Axis sections and the `AxisName` each is expected to carry.
const AXIS_Z: (&str, &str) = ("Axis 3 Parameters Common", "\"Z\"");
const AXIS_C: (&str, &str) = ("Axis 2 Parameters Common", "\"Ch\"");
const AXIS_T: (&str, &str) = ("Axis 4 Parameters Common", "\"T\"");

/// Read the image dimensions from an OIF/OIB INI description.
///
/// Z, channel and time sizes are only taken if the respective axis section
/// carries the expected axis name; otherwise the size is 0.
pub fn dimensions_from_ini(ini: &IniDocument, source: &str) -> Result<Dimensions, FormatError> {
    let with_source = |err: ParseError| FormatError::InvalidMetadata {
        path: source.to_string(),
        reason: err.to_string(),
    };

    let b = ini
        .get_parsed(REFERENCE_IMAGE_SECTION, "ValidBitCounts")
        .map_err(with_source)?;
    // Width is X and height is Y. Older readers swapped the two, which only
    // shows up with non-square tiles.
    let x = ini
        .get_parsed(REFERENCE_IMAGE_SECTION, "ImageWidth")
        .map_err(with_source)?;
    let y = ini
        .get_parsed(REFERENCE_IMAGE_SECTION, "ImageHeight")
        .map_err(with_source)?;

    let z = axis_size(ini, AXIS_Z, "Z axis").map_err(with_source)?;
    let c = axis_size(ini, AXIS_C, "channels").map_err(with_source)?;
    let t = axis_size(ini, AXIS_T, "timepoints").map_err(with_source)?;

    let dim = Dimensions { b, c, t, x, y, z };
    info!("Parsed image dimensions: {}", dim);
    Ok(dim)
}

fn axis_size(
    ini: &IniDocument,
    (section, expected): (&str, &str),
    what: &str,
) -> Result<u32, ParseError> {
    ini.get(section, "MaxSize")?;
    let name = ini.get(section, "AxisName")?;
    if name != expected {
        warn!("Couldn't find {} in metadata!", what);
        return Ok(0);
    }
    ini.get_parsed(section, "MaxSize")
}

/// Run `f` with a subscriber that records warnings, returning the log text.
#[cfg(test)]
pub(crate) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer(Arc::new(Mutex::new(Vec::new())));
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}
