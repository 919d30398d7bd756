//! Dataset model for microscopy metadata.
//!
//! The model mirrors how tiled acquisitions are organized:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            MosaicExperiment             │
//! │  (one project file, many mosaics)       │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              MosaicData                 │
//! │  (tile grid, overlap, sub-volumes)      │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │               ImageData                 │
//! │  (storage, dimensions, position)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The records are populated by the readers in [`crate::format`] and
//! consumed by the generators in [`crate::imagej`].

mod experiment;
mod image;
mod mosaic;
mod types;

pub use experiment::{ExperimentInfo, MosaicExperiment};
pub use image::ImageData;
pub use mosaic::{MosaicData, MosaicGrid, LOW_OVERLAP_PCT};
pub use types::{DatasetType, Dimensions, OverlapUnit, Position, StorageType, TileNumbers};
