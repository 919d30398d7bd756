//! Fiji TileConfiguration files.
//!
//! The "Grid/Collection stitching" plugin reads tile positions from a
//! plain text file:
//!
//! ```text
//! # Define the number of dimensions we are working on
//! dim = 3
//!
//! # Define the image coordinates (in pixels)
//! Slide1sec001/Slide1sec001_01.oif; ; (0.000000, 0.000000, 0.000000)
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::dataset::{ImageData, MosaicData, MosaicExperiment};
use crate::error::MacroError;
use crate::io::write_file;

/// Options for generating tile configurations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileConfigOptions {
    /// Write 2D coordinates (`dim = 2`)
    pub force_2d: bool,

    /// Order the tile lines by file name
    pub sort: bool,

    /// Replaces the extension of every tile file, e.g. `.ics` for tiles
    /// that were converted before stitching
    pub suffix: Option<String>,
}

impl Default for TileConfigOptions {
    fn default() -> Self {
        Self {
            force_2d: false,
            sort: true,
            suffix: None,
        }
    }
}

/// Name of the tile configuration file for a mosaic index.
pub fn tile_config_name(index: u32, padlen: usize) -> String {
    format!("mosaic_{:0width$}.txt", index, width = padlen)
}

/// Number of digits needed to write `count`.
pub fn pad_length(count: usize) -> usize {
    count.max(1).to_string().len()
}

/// Tile configuration names for all mosaics of an experiment, in order.
///
/// Mosaics without an index are named after their position.
pub fn tile_config_names(experiment: &MosaicExperiment) -> Vec<String> {
    let padlen = pad_length(experiment.len());
    experiment
        .iter()
        .enumerate()
        .map(|(pos, mosaic)| tile_config_name(mosaic.index.unwrap_or(pos as u32), padlen))
        .collect()
}

fn tile_path(tile: &ImageData, project_dir: &Path, suffix: Option<&str>) -> String {
    let full = &tile.storage.full;
    let rel = full.strip_prefix(project_dir).unwrap_or(full);
    let rel = match suffix {
        Some(suffix) => {
            let mut base = rel.with_extension("").into_os_string();
            base.push(suffix);
            PathBuf::from(base)
        }
        None => rel.to_path_buf(),
    };
    rel.to_string_lossy().replace('\\', "/")
}

/// Generate the tile configuration text for a mosaic.
pub fn gen_tile_config(mosaic: &MosaicData, opts: &TileConfigOptions) -> Result<String, MacroError> {
    let project_dir = mosaic.storage.path.as_path();

    let mut lines = Vec::with_capacity(mosaic.len());
    for tile in &mosaic.subvol {
        let (x, y) = tile
            .position
            .relative
            .ok_or_else(|| MacroError::MissingPosition(tile.storage.fname.clone()))?;
        let path = tile_path(tile, project_dir, opts.suffix.as_deref());
        let coords = if opts.force_2d {
            format!("({:.6}, {:.6})", x, y)
        } else {
            format!("({:.6}, {:.6}, {:.6})", x, y, 0.0)
        };
        lines.push(format!("{}; ; {}", path, coords));
    }
    if opts.sort {
        lines.sort();
    }

    let dim = if opts.force_2d { 2 } else { 3 };
    let mut config = format!(
        "# Define the number of dimensions we are working on\n\
         dim = {}\n\n\
         # Define the image coordinates (in pixels)\n",
        dim
    );
    for line in lines {
        config.push_str(&line);
        config.push('\n');
    }
    Ok(config)
}

/// Write the tile configuration of a mosaic into `dir` as `name`.
///
/// Use [`tile_config_names`] for the names the stitching macro expects.
/// Returns the written path.
pub fn write_tile_config(
    mosaic: &MosaicData,
    dir: &Path,
    name: &str,
    opts: &TileConfigOptions,
) -> Result<PathBuf, MacroError> {
    let config = gen_tile_config(mosaic, opts)?;
    let path = dir.join(name);
    write_file(&path, &config)?;
    debug!("Wrote tile config to {}", path.display());
    Ok(path)
}

/// Write tile configurations for all mosaics into the project directory.
pub fn write_all_tile_configs(
    experiment: &MosaicExperiment,
    opts: &TileConfigOptions,
) -> Result<Vec<PathBuf>, MacroError> {
    let dir = experiment.infile.path.as_path();
    let names = tile_config_names(experiment);

    let mut written = Vec::with_capacity(experiment.len());
    for (mosaic, name) in experiment.iter().zip(names) {
        written.push(write_tile_config(mosaic, dir, &name, opts)?);
    }
    info!(
        "Wrote {} tile configurations to {}",
        written.len(),
        dir.display()
    );
    Ok(written)
}
