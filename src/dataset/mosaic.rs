use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::DatasetError;
use crate::io::StoragePath;

use super::image::ImageData;
use super::types::{OverlapUnit, StorageType};

/// Overlap (in percent) at or below which a warning is logged.
pub const LOW_OVERLAP_PCT: f64 = 5.0;

/// Number of sub-volumes along each spatial axis of a cuboid mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MosaicGrid {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl MosaicGrid {
    /// Total number of grid positions.
    pub fn count(&self) -> u32 {
        self.x * self.y * self.z
    }
}

/// A full cuboid mosaic ("tiling") volume.
///
/// All sub-volumes share the grid and overlap of the mosaic. Individual
/// mosaics of a project do not have separate project files, so the storage
/// points at the project file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MosaicData {
    /// Storage layout
    pub st_type: StorageType,

    /// Location of the describing file
    pub storage: StoragePath,

    /// Number of tiles along each axis
    pub grid: MosaicGrid,

    /// Overlap amount
    overlap: f64,

    /// Overlap unit
    overlap_units: OverlapUnit,

    /// Tiles of this mosaic
    pub subvol: Vec<ImageData>,

    /// Index of this mosaic within the project
    pub index: Option<u32>,

    /// Object identifier (FluoView 3000)
    pub object_id: Option<String>,

    /// Protocol group identifier (FluoView 3000)
    pub group_id: Option<String>,
}

impl MosaicData {
    /// Create an empty cuboid mosaic with the given tile grid.
    pub fn new(st_type: StorageType, storage: StoragePath, grid: MosaicGrid) -> Self {
        info!("Mosaic: {}x{}x{}", grid.x, grid.y, grid.z);
        MosaicData {
            st_type,
            storage,
            grid,
            overlap: 0.0,
            overlap_units: OverlapUnit::Px,
            subvol: Vec::new(),
            index: None,
            object_id: None,
            group_id: None,
        }
    }

    /// Add a sub-volume (tile).
    pub fn add_subvol(&mut self, image: ImageData) {
        debug!("Adding sub-volume: {}", image.storage.fname);
        self.subvol.push(image);
    }

    /// Set the overlap amount and unit.
    pub fn set_overlap(&mut self, value: f64, units: OverlapUnit) {
        debug!("Setting overlap to {} {}.", value, units);
        if units == OverlapUnit::Pct && value <= LOW_OVERLAP_PCT {
            warn!("Low overlap {:.1}%!", value);
        }
        self.overlap = value;
        self.overlap_units = units;
    }

    /// Get the overlap amount in a specific unit.
    ///
    /// Only percent is supported, and only if the overlap was stored in
    /// percent; no unit conversion is done.
    pub fn get_overlap(&self, units: OverlapUnit) -> Result<f64, DatasetError> {
        if units != OverlapUnit::Pct {
            return Err(DatasetError::UnknownOverlapUnit(format!(
                "{} (requested)",
                units
            )));
        }
        if units != self.overlap_units {
            return Err(DatasetError::UnitConversion {
                from: self.overlap_units.to_string(),
                to: units.to_string(),
            });
        }
        Ok(self.overlap)
    }

    /// Unit the overlap is stored in.
    pub fn overlap_units(&self) -> OverlapUnit {
        self.overlap_units
    }

    /// Number of tiles added so far.
    pub fn len(&self) -> usize {
        self.subvol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subvol.is_empty()
    }
}
