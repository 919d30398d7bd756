use serde::Serialize;
use tracing::{debug, info};

use crate::error::DatasetError;
use crate::format::ImageFormat;
use crate::io::StoragePath;

use super::types::{DatasetType, Dimensions, Position, StorageType, TileNumbers};

/// An image dataset (2D to 5D), typically one tile of a mosaic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageData {
    /// Kind of dataset
    pub ds_type: DatasetType,

    /// On-disk layout of the dataset
    pub st_type: StorageType,

    /// Location of the dataset file
    pub storage: StoragePath,

    /// Vendor format the metadata was read from, if any
    pub format: Option<ImageFormat>,

    /// Image dimensions
    pub dimensions: Dimensions,

    /// Stage and relative position within a mosaic
    pub position: Position,

    /// Grid indices within a mosaic
    pub tile_numbers: Option<TileNumbers>,

    /// Tile number as reported by the acquisition software
    pub index: Option<u32>,
}

impl ImageData {
    /// Create an image dataset.
    ///
    /// Storage type [`StorageType::Single`] requires a file name.
    pub fn new(
        ds_type: DatasetType,
        st_type: StorageType,
        storage: StoragePath,
    ) -> Result<Self, DatasetError> {
        debug!("Creating an 'ImageData' object ({}).", ds_type);
        if st_type == StorageType::Single && storage.fname.is_empty() {
            return Err(DatasetError::MissingFileName);
        }

        Ok(ImageData {
            ds_type,
            st_type,
            storage,
            format: None,
            dimensions: Dimensions::default(),
            position: Position::default(),
            tile_numbers: None,
            index: None,
        })
    }

    /// Set the raw stage coordinates.
    pub fn set_stage_coords(&mut self, coords: (Option<f64>, Option<f64>)) {
        debug!("Setting stage coordinates: {:?}.", coords);
        self.position.stage = Some(coords);
    }

    /// Set the tile grid indices.
    pub fn set_tile_numbers(&mut self, x: u32, y: u32, z: Option<u32>) {
        debug!("Tile grid indices x / y / z: {} / {} / {:?}", x, y, z);
        self.tile_numbers = Some(TileNumbers { x, y, z });
    }

    /// Calculate the relative position from the tile overlap (in percent).
    ///
    /// The position is `size * (100 - overlap) / 100 * tile_index` along
    /// each axis.
    pub fn set_relative_position(&mut self, overlap_pct: f64) -> Result<(), DatasetError> {
        let tiles = self
            .tile_numbers
            .ok_or_else(|| DatasetError::MissingTileNumbers(self.storage.fname.clone()))?;

        let ratio = (100.0 - overlap_pct) / 100.0;
        let pos_x = f64::from(self.dimensions.x) * ratio * f64::from(tiles.x);
        let pos_y = f64::from(self.dimensions.y) * ratio * f64::from(tiles.y);
        info!("Setting relative coordinates: {}, {}.", pos_x, pos_y);
        self.position.relative = Some((pos_x, pos_y));
        Ok(())
    }
}
