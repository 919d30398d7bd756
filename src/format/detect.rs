//! Format detection for Olympus image and project files.
//!
//! Image files are identified by their extension and cross-checked against
//! their magic bytes:
//!
//! - **OIF**: UTF-16 INI text, usually starting with a byte order mark
//! - **OIB**: OLE2 compound document (`D0 CF 11 E0 A1 B1 1A E1`)
//! - **OIR**: Olympus raw format (`OLYMPUSRAWFORMAT`)
//!
//! Project files are identified by the root element of their XML.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::FormatError;
use crate::io::has_utf16_bom;

use super::xml::ns;

// =============================================================================
// ImageFormat
// =============================================================================

/// Olympus image file formats that carry per-tile metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageFormat {
    /// Olympus Image File: UTF-16 INI description next to a data directory
    Oif,

    /// Olympus Image Binary: OLE2 container with the OIF content inside
    Oib,

    /// Olympus Image Raw (FluoView 3000): binary with embedded XML blocks
    Oir,
}

impl ImageFormat {
    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            ImageFormat::Oif => "Olympus OIF",
            ImageFormat::Oib => "Olympus OIB",
            ImageFormat::Oir => "Olympus OIR",
        }
    }

    /// The file extension, without the dot.
    pub const fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Oif => "oif",
            ImageFormat::Oib => "oib",
            ImageFormat::Oir => "oir",
        }
    }

    /// Look up a format by extension (with or without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "oif" => Some(ImageFormat::Oif),
            "oib" => Some(ImageFormat::Oib),
            "oir" => Some(ImageFormat::Oir),
            _ => None,
        }
    }

    /// Check whether `bytes` look like the start of a file in this format.
    pub fn matches_magic(&self, bytes: &[u8]) -> bool {
        match self {
            ImageFormat::Oif => has_utf16_bom(bytes),
            ImageFormat::Oib => is_ole_header(bytes),
            ImageFormat::Oir => is_oir_header(bytes),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Magic bytes of OLE2 compound documents.
pub const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Magic string at the start of OIR files.
pub const OIR_MAGIC: &[u8] = b"OLYMPUSRAWFORMAT";

/// Check if bytes start with the OLE2 compound document signature.
pub fn is_ole_header(bytes: &[u8]) -> bool {
    bytes.starts_with(&OLE_MAGIC)
}

/// Check if bytes start with the OIR signature.
pub fn is_oir_header(bytes: &[u8]) -> bool {
    bytes.starts_with(OIR_MAGIC)
}

/// Detect the image format of a file from its extension.
///
/// # Returns
/// * `Ok(ImageFormat)` - The format matching the extension
/// * `Err(FormatError::UnsupportedFormat)` - Unknown extension
pub fn detect_image_format(path: &Path) -> Result<ImageFormat, FormatError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();

    ImageFormat::from_extension(&ext).ok_or_else(|| FormatError::UnsupportedFormat {
        reason: format!("Unknown dataset type: {}", path.display()),
    })
}

/// Log a warning if the header bytes don't match the detected format.
///
/// Extensions are authoritative; the magic check only helps diagnosing
/// renamed or truncated files.
pub fn check_magic(format: ImageFormat, header: &[u8], source: &str) -> bool {
    let ok = format.matches_magic(header);
    if ok {
        debug!("{} magic bytes found in {}", format.name(), source);
    } else {
        warn!("{} does not start with the expected {} signature", source, format.name());
    }
    ok
}

// =============================================================================
// ProjectFormat
// =============================================================================

/// Root element of FluoView mosaic logs.
pub const FLUOVIEW_ROOT_TAG: &str = "XYStage";

/// Local name of the FluoView 3000 root element (in the MATL namespace).
pub const FLUOVIEW3K_ROOT_TAG: &str = "properties";

/// Project file formats describing tiled experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectFormat {
    /// FluoView `MATL_Mosaic.log`
    FluoViewMosaic,

    /// FluoView 3000 `matl.omp2info`
    FluoView3kMosaic,
}

impl ProjectFormat {
    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            ProjectFormat::FluoViewMosaic => "FluoView Mosaic",
            ProjectFormat::FluoView3kMosaic => "FluoView 3000 Mosaic",
        }
    }
}

/// Detect the project format from XML text.
pub fn detect_project_format(xml: &str) -> Result<ProjectFormat, FormatError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| FormatError::UnsupportedFormat {
        reason: format!("not an XML project file: {}", e),
    })?;
    let root = doc.root_element().tag_name();

    match (root.namespace(), root.name()) {
        (None, FLUOVIEW_ROOT_TAG) => Ok(ProjectFormat::FluoViewMosaic),
        (Some(ns::MATL), FLUOVIEW3K_ROOT_TAG) => Ok(ProjectFormat::FluoView3kMosaic),
        (ns, name) => Err(FormatError::UnsupportedFormat {
            reason: format!(
                "unknown project root element: {}{}",
                ns.map(|n| format!("{{{}}}", n)).unwrap_or_default(),
                name
            ),
        }),
    }
}

// =============================================================================
// Tests
// =============================================================================
