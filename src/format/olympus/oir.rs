use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};

use tracing::{debug, error, info};

use crate::dataset::Dimensions;
use crate::error::{FormatError, IoError, ParseError};
use crate::format::detect::{check_magic, ImageFormat, OIR_MAGIC};
use crate::format::xml::{attribute, child, child_parse, child_text, children, ns};
use crate::io::StoragePath;

use super::MetadataReader;

/// Root tag of the XML block carrying frame size and bit depth.
pub const FRAME_PROPERTIES_TAG: &str = "lsmframe:frameProperties";

/// Root tag of the XML block carrying the acquisition axes.
pub const IMAGE_PROPERTIES_TAG: &str = "lsmimage:imageProperties";

/// Minimum length of a printable run to be considered an XML block.
pub const DEFAULT_MIN_LEN: usize = 100;

/// Bytes read per chunk while scanning.
pub const SCAN_CHUNK_SIZE: usize = 1 << 20;

const XML_DECL: &[u8] = b"<?xml";
const Z_AXIS_TYPE: &str = "commonparam:ZAxisParam";
const Z_AXIS_PARAM_NAME: &str = "Start End";

// =============================================================================
// XML Block Scanner
// =============================================================================

/// Printable ASCII, including the whitespace control characters.
pub fn is_printable(byte: u8) -> bool {
    byte.is_ascii_graphic() || matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Scan a binary stream for embedded XML blocks.
///
/// The stream is read in chunks of [`SCAN_CHUNK_SIZE`] bytes. Runs of
/// printable bytes that are at least `min_len` long and contain an XML
/// declaration are checked for `<tag` of every requested tag. A matching
/// run is stored from its XML declaration up to the last `>`, trailing
/// garbage is dropped.
///
/// Scanning stops as soon as all tags were found; reaching EOF earlier is
/// an error. If a tag occurs in several blocks, the last one wins.
pub fn scan_xml_sections<R: Read>(
    mut reader: R,
    tags: &[&str],
    min_len: usize,
    source: &str,
) -> Result<HashMap<String, String>, FormatError> {
    let mut found: HashMap<String, String> = HashMap::new();
    let mut collected: Vec<u8> = Vec::new();
    let mut chunk = vec![0u8; SCAN_CHUNK_SIZE];
    let mut total = 0usize;

    loop {
        let n = reader
            .read(&mut chunk)
            .map_err(|e| IoError::read(source.to_string(), &e))?;
        if n == 0 {
            // A block right at the end of the file has no terminator
            check_run(&collected, tags, min_len, &mut found);
            if found.len() == tags.len() {
                return Ok(found);
            }
            debug!("Read {} bytes from {}.", total, source);
            let missing: Vec<&str> = tags
                .iter()
                .filter(|t| !found.contains_key(**t))
                .copied()
                .collect();
            return Err(FormatError::MissingXmlBlocks {
                path: source.to_string(),
                missing: missing.join(", "),
            });
        }
        total += n;

        for &byte in &chunk[..n] {
            if is_printable(byte) {
                collected.push(byte);
                continue;
            }
            check_run(&collected, tags, min_len, &mut found);
            collected.clear();
            if found.len() == tags.len() {
                debug!("Stopping after {} bytes.", total);
                return Ok(found);
            }
        }
    }
}

fn check_run(run: &[u8], tags: &[&str], min_len: usize, found: &mut HashMap<String, String>) {
    if run.len() < min_len {
        return;
    }
    let Some(start) = find(run, XML_DECL) else {
        return;
    };

    for tag in tags {
        let open = format!("<{}", tag);
        if !contains(run, open.as_bytes()) {
            continue;
        }
        debug!("Found <{}> XML section.", tag);
        let end = run.iter().rposition(|&b| b == b'>').map_or(0, |p| p + 1);
        if end <= start {
            continue;
        }
        if run.len() > end {
            debug!("Stripping {} trailing chars.", run.len() - end);
        }
        // Only printable ASCII ends up in a run
        let text = String::from_utf8_lossy(&run[start..end]).into_owned();
        found.insert(tag.to_string(), text);
    }
}

// =============================================================================
// OirReader
// =============================================================================

/// Reader for Olympus `.oir` files (FluoView 3000).
///
/// Only the frame size, bit depth and Z size are known; channel and time
/// point counts stay at 0.
#[derive(Debug, Clone)]
pub struct OirReader {
    storage: StoragePath,
    xml: HashMap<String, String>,
    dimensions: Dimensions,
}

impl OirReader {
    /// Open and scan an OIR file.
    pub fn open(storage: &StoragePath) -> Result<Self, FormatError> {
        info!("Scanning OIR file: {}", storage.full.display());
        let file = File::open(&storage.full)
            .map_err(|e| IoError::read(storage.full.display().to_string(), &e))?;
        Self::from_reader(storage.clone(), file)
    }

    /// Scan OIR content from any reader.
    pub fn from_reader<R: Read>(storage: StoragePath, reader: R) -> Result<Self, FormatError> {
        let source = storage.full.display().to_string();
        let mut reader = BufReader::new(reader);
        let header = reader
            .fill_buf()
            .map_err(|e| IoError::read(source.clone(), &e))?;
        check_magic(ImageFormat::Oir, &header[..header.len().min(OIR_MAGIC.len())], &source);

        let xml = scan_xml_sections(
            reader,
            &[FRAME_PROPERTIES_TAG, IMAGE_PROPERTIES_TAG],
            DEFAULT_MIN_LEN,
            &source,
        )?;

        let dimensions = parse_dimensions(&xml).map_err(|e| {
            error!("Error parsing dimensions from {}!", source);
            FormatError::InvalidMetadata {
                path: source.clone(),
                reason: e.to_string(),
            }
        })?;
        info!("Parsed image dimensions: {}", dimensions);

        Ok(OirReader {
            storage,
            xml,
            dimensions,
        })
    }

    /// The raw XML block found for `tag`.
    pub fn xml_block(&self, tag: &str) -> Option<&str> {
        self.xml.get(tag).map(String::as_str)
    }
}

impl MetadataReader for OirReader {
    fn format(&self) -> ImageFormat {
        ImageFormat::Oir
    }

    fn storage(&self) -> &StoragePath {
        &self.storage
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
}

fn block<'a>(xml: &'a HashMap<String, String>, tag: &str) -> Result<&'a str, ParseError> {
    xml.get(tag)
        .map(String::as_str)
        .ok_or_else(|| ParseError::MissingElement(tag.to_string()))
}

fn parse_dimensions(xml: &HashMap<String, String>) -> Result<Dimensions, ParseError> {
    let mut dim = Dimensions::default();
    parse_frame_properties(block(xml, FRAME_PROPERTIES_TAG)?, &mut dim)?;
    dim.z = parse_z_size(block(xml, IMAGE_PROPERTIES_TAG)?)?;
    Ok(dim)
}

fn parse_frame_properties(text: &str, dim: &mut Dimensions) -> Result<(), ParseError> {
    debug!("Trying to parse frameProperties XML...");
    let doc = roxmltree::Document::parse(text)?;
    let img_def = child(doc.root_element(), (Some(ns::COMMONFRAME), "imageDefinition"))?;

    dim.x = child_parse(img_def, (Some(ns::BASE), "width"))?;
    dim.y = child_parse(img_def, (Some(ns::BASE), "height"))?;
    dim.b = child_parse(img_def, (Some(ns::BASE), "bitCounts"))?;
    Ok(())
}

/// Z size of the first "Start End" Z axis, 0 if there is none.
fn parse_z_size(text: &str) -> Result<u32, ParseError> {
    debug!("Trying to parse imageProperties XML...");
    let doc = roxmltree::Document::parse(text)?;
    let acquisition = child(doc.root_element(), (Some(ns::COMMONIMAGE), "acquisition"))?;
    let param = child(acquisition, (Some(ns::COMMONIMAGE), "imagingParam"))?;

    for axis in children(param, (Some(ns::COMMONPARAM), "axis")) {
        if attribute(axis, (Some(ns::XSI), "type"))? != Z_AXIS_TYPE {
            continue;
        }
        if child_text(axis, (Some(ns::COMMONPARAM), "paramName"))? == Z_AXIS_PARAM_NAME {
            let z = child_parse(axis, (Some(ns::COMMONPARAM), "maxSize"))?;
            debug!("Found Z-axis size: {}", z);
            return Ok(z);
        }
    }
    Ok(0)
}
