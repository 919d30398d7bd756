use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DatasetError;

// =============================================================================
// Dataset and Storage Types
// =============================================================================

/// Kind of dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    /// A tiled dataset made of several sub-volumes
    Mosaic,

    /// A (possibly multi-channel, time-lapse) image stack
    Stack,

    /// A single image
    Single,
}

impl DatasetType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Mosaic => "mosaic",
            DatasetType::Stack => "stack",
            DatasetType::Single => "single",
        }
    }
}

impl FromStr for DatasetType {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mosaic" => Ok(DatasetType::Mosaic),
            "stack" => Ok(DatasetType::Stack),
            "single" => Ok(DatasetType::Single),
            other => Err(DatasetError::InvalidDatasetType(other.to_string())),
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a dataset is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// A single container file holding the full dataset
    Single,

    /// A directory hierarchy
    Tree,

    /// A sequence of files
    Sequence,
}

impl StorageType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StorageType::Single => "single",
            StorageType::Tree => "tree",
            StorageType::Sequence => "sequence",
        }
    }
}

impl FromStr for StorageType {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(StorageType::Single),
            "tree" => Ok(StorageType::Tree),
            "sequence" => Ok(StorageType::Sequence),
            other => Err(DatasetError::InvalidStorageType(other.to_string())),
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Overlap Units
// =============================================================================

/// Unit of a tile overlap value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapUnit {
    Px,
    Pct,
    Um,
    Nm,
    Mm,
}

impl OverlapUnit {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OverlapUnit::Px => "px",
            OverlapUnit::Pct => "pct",
            OverlapUnit::Um => "um",
            OverlapUnit::Nm => "nm",
            OverlapUnit::Mm => "mm",
        }
    }
}

impl FromStr for OverlapUnit {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "px" => Ok(OverlapUnit::Px),
            "pct" => Ok(OverlapUnit::Pct),
            "um" => Ok(OverlapUnit::Um),
            "nm" => Ok(OverlapUnit::Nm),
            "mm" => Ok(OverlapUnit::Mm),
            other => Err(DatasetError::UnknownOverlapUnit(other.to_string())),
        }
    }
}

impl fmt::Display for OverlapUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Dimensions and Positions
// =============================================================================

/// Image dimensions as stored in the vendor metadata.
///
/// A value of 0 means the dimension was not found in the metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    /// Bit depth
    pub b: u32,

    /// Number of channels
    pub c: u32,

    /// Number of timepoints
    pub t: u32,

    /// Width in pixels
    pub x: u32,

    /// Height in pixels
    pub y: u32,

    /// Number of Z slices
    pub z: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={} y={} z={} c={} t={} bits={}",
            self.x, self.y, self.z, self.c, self.t, self.b
        )
    }
}

/// Grid indices of a tile within its mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileNumbers {
    pub x: u32,
    pub y: u32,
    pub z: Option<u32>,
}

/// Spatial information for tiles of a multi-image dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    /// Raw stage coordinates; either may be unknown
    pub stage: Option<(Option<f64>, Option<f64>)>,

    /// Position relative to the mosaic origin, in pixels
    pub relative: Option<(f64, f64)>,
}
