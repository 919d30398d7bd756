//! # micrometa
//!
//! Metadata readers for Olympus FluoView microscopy data and a generator
//! for ImageJ / Fiji stitching macros.
//!
//! ## Features
//!
//! - **Project readers**: FluoView `MATL_Mosaic.log` and FluoView 3000
//!   `matl.omp2info` mosaic projects
//! - **Image metadata**: dimensions from OIF, OIB and OIR files, without
//!   touching the pixel data
//! - **Stitching**: Fiji TileConfiguration files and a macro running the
//!   "Grid/Collection stitching" plugin on every mosaic
//!
//! ## Architecture
//!
//! - [`dataset`] - Experiment, mosaic and image data model
//! - [`mod@format`] - Project and image file readers
//! - [`imagej`] - Tile configurations and macro generation
//! - [`io`] - Path handling and text decoding
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use micrometa::format::open_project;
//! use micrometa::imagej::{
//!     gen_stitching_macro_code, write_all_tile_configs, write_stitching_macro,
//!     StitchingOptions, TileConfigOptions,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let experiment = open_project(Path::new("OIFmosaic/MATL_Mosaic.log"))?;
//! write_all_tile_configs(&experiment, &TileConfigOptions::default())?;
//!
//! let code = gen_stitching_macro_code(&experiment, "stitching", &StitchingOptions::default())?;
//! write_stitching_macro(&code, "stitch_all.ijm", &experiment.infile.path)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod format;
pub mod imagej;
pub mod io;

// Re-export commonly used types
pub use config::{Cli, Command, InfoConfig, StitchConfig};
pub use dataset::{
    DatasetType, Dimensions, ImageData, MosaicData, MosaicExperiment, OverlapUnit, StorageType,
};
pub use error::{DatasetError, FormatError, IoError, MacroError, ParseError};
pub use format::{open_image, open_project, FluoView3kMosaic, FluoViewMosaic, ImageFormat};
pub use imagej::{StitchingOptions, TileConfigOptions};
pub use io::StoragePath;
