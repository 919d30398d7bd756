use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use cfb::CompoundFile;
use tracing::{debug, info, warn};

use crate::dataset::Dimensions;
use crate::error::{FormatError, IoError};
use crate::format::detect::{check_magic, ImageFormat, OLE_MAGIC};
use crate::format::ini::IniDocument;
use crate::io::{decode_utf16, StoragePath};

use super::{dimensions_from_ini, MetadataReader};

/// Name of the description stream inside OIB containers.
pub const OIB_INFO_STREAM: &str = "OibInfo.txt";

/// The OIB format version this reader was written against.
pub const EXPECTED_OIB_VERSION: &str = "2.0.0.0";

const OIB_SAVE_INFO_SECTION: &str = "OibSaveInfo";

/// Reader for Olympus `.oib` files.
///
/// An OIB file is an OLE2 compound document. Its `OibInfo.txt` stream names
/// the "main file" stream, which holds the same UTF-16 INI content as an
/// OIF file. Both streams are merged into one INI document.
#[derive(Debug, Clone)]
pub struct OibReader {
    storage: StoragePath,
    ini: IniDocument,
    version: String,
    main_file: String,
    dimensions: Dimensions,
}

impl OibReader {
    /// Open and parse an OIB file.
    pub fn open(storage: &StoragePath) -> Result<Self, FormatError> {
        info!("Parsing OIB file: {}", storage.full.display());
        let file = File::open(&storage.full)
            .map_err(|e| IoError::read(storage.full.display().to_string(), &e))?;
        Self::from_reader(storage.clone(), file)
    }

    /// Parse an OIB container from any seekable reader.
    pub fn from_reader<F: Read + Seek>(storage: StoragePath, mut inner: F) -> Result<Self, FormatError> {
        let source = storage.full.display().to_string();
        let header = read_header(&mut inner).map_err(|e| IoError::read(source.clone(), &e))?;
        check_magic(ImageFormat::Oib, &header, &source);

        let mut container = CompoundFile::open(inner)
            .map_err(|e| FormatError::Container(format!("Error parsing OIB file {}: {}", source, e)))?;

        info!("Parsing OIB description file \"{}\".", OIB_INFO_STREAM);
        let info_bytes = read_stream(&mut container, OIB_INFO_STREAM).map_err(|e| {
            FormatError::Container(format!("OIB description ({}) missing: {}", OIB_INFO_STREAM, e))
        })?;
        let mut ini = IniDocument::parse(&decode_utf16(&info_bytes)?)?;

        let version = ini.get(OIB_SAVE_INFO_SECTION, "Version")?.to_string();
        let main_file = ini.get(OIB_SAVE_INFO_SECTION, "MainFileName")?.to_string();
        if version != EXPECTED_OIB_VERSION {
            warn!("OIB has unknown format version {}!", version);
        } else {
            info!("OIB Format Version: {}", version);
        }
        debug!("Main File Name: {}", main_file);
        info!("Finished parsing OIB description file.");

        let main_bytes = read_stream(&mut container, &main_file)?;
        ini.read_str(&decode_utf16(&main_bytes)?)?;
        debug!("Finished parsing OIB file.");

        let dimensions = dimensions_from_ini(&ini, &source)?;
        Ok(OibReader {
            storage,
            ini,
            version,
            main_file,
            dimensions,
        })
    }

    /// Version string from `[OibSaveInfo]`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name of the stream holding the main description.
    pub fn main_file(&self) -> &str {
        &self.main_file
    }

    /// The merged INI description.
    pub fn ini(&self) -> &IniDocument {
        &self.ini
    }
}

impl MetadataReader for OibReader {
    fn format(&self) -> ImageFormat {
        ImageFormat::Oib
    }

    fn storage(&self) -> &StoragePath {
        &self.storage
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
}

/// Read the signature bytes and rewind to where the reader started.
fn read_header<F: Read + Seek>(inner: &mut F) -> std::io::Result<Vec<u8>> {
    let start = inner.stream_position()?;
    let mut header = Vec::with_capacity(OLE_MAGIC.len());
    inner.by_ref().take(OLE_MAGIC.len() as u64).read_to_end(&mut header)?;
    inner.seek(SeekFrom::Start(start))?;
    Ok(header)
}

/// Read a whole stream from the container. Backslashes in `name` separate
/// storages, as written by FluoView.
fn read_stream<F: Read + Seek>(
    container: &mut CompoundFile<F>,
    name: &str,
) -> Result<Vec<u8>, FormatError> {
    let path = format!("/{}", name.replace('\\', "/").trim_start_matches('/'));
    let mut stream = container
        .open_stream(&path)
        .map_err(|e| FormatError::Container(format!("stream {}: {}", path, e)))?;

    let mut bytes = Vec::new();
    stream
        .read_to_end(&mut bytes)
        .map_err(|e| IoError::read(path.clone(), &e))?;
    Ok(bytes)
}
