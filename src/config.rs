//! Command-line configuration for micrometa.
//!
//! Two subcommands are available:
//!
//! - `info`: print a summary of a mosaic project
//! - `stitch`: write Fiji tile configurations and a stitching macro
//!
//! # Environment Variables
//!
//! Most options can also be set via environment variables with the
//! `MICROMETA_` prefix:
//!
//! - `MICROMETA_TEMPLATE` - Built-in macro template (default: stitching)
//! - `MICROMETA_TEMPLATE_FILE` - Custom macro template file
//! - `MICROMETA_MACRO_NAME` - Macro file name (default: stitch_all.ijm)
//! - `MICROMETA_OUTPUT_DIR` - Directory for the macro and fused images
//! - `MICROMETA_SUFFIX` - Replacement extension for tile files
//! - `MICROMETA_FUSION_METHOD` - Fusion method (default: Linear Blending)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::imagej::{
    StitchingOptions, TileConfigOptions, BUILTIN_TEMPLATES, DEFAULT_ABS_DISPLACEMENT,
    DEFAULT_FUSION_METHOD, DEFAULT_MAX_AVG_DISPLACEMENT, DEFAULT_REGRESSION_THRESHOLD,
};

// =============================================================================
// Default Values
// =============================================================================

/// Default built-in macro template.
pub const DEFAULT_TEMPLATE: &str = "stitching";

/// Default file name of the generated macro.
pub const DEFAULT_MACRO_NAME: &str = "stitch_all.ijm";

// =============================================================================
// CLI Arguments
// =============================================================================

/// micrometa - Olympus FluoView mosaic metadata tools.
///
/// Reads FluoView and FluoView 3000 mosaic projects and generates the
/// inputs for Fiji's Grid/Collection stitching plugin.
#[derive(Parser, Debug, Clone)]
#[command(name = "micrometa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print a summary of a mosaic project
    Info(InfoConfig),

    /// Write tile configurations and a Fiji stitching macro
    Stitch(StitchConfig),
}

/// Options of the `info` subcommand.
#[derive(Args, Debug, Clone)]
pub struct InfoConfig {
    /// Project file (MATL_Mosaic.log or matl.omp2info)
    pub project: PathBuf,

    /// Print the parsed experiment as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable verbose logging.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl InfoConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.project.as_os_str().is_empty() {
            return Err("A project file is required".to_string());
        }
        Ok(())
    }
}

/// Options of the `stitch` subcommand.
#[derive(Args, Debug, Clone)]
pub struct StitchConfig {
    /// Project file (MATL_Mosaic.log or matl.omp2info)
    pub project: PathBuf,

    // =========================================================================
    // Macro Configuration
    // =========================================================================
    /// Built-in macro template (stitching, stitching_display).
    #[arg(long, default_value = DEFAULT_TEMPLATE, env = "MICROMETA_TEMPLATE")]
    pub template: String,

    /// Custom macro template file, overrides --template.
    #[arg(long, env = "MICROMETA_TEMPLATE_FILE")]
    pub template_file: Option<PathBuf>,

    /// File name of the generated macro.
    #[arg(long, default_value = DEFAULT_MACRO_NAME, env = "MICROMETA_MACRO_NAME")]
    pub macro_name: String,

    /// Directory for the macro and the fused images.
    ///
    /// Tile configurations are always written next to the project file.
    #[arg(long, env = "MICROMETA_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    // =========================================================================
    // Tile Configuration
    // =========================================================================
    /// Replacement extension for tile files (e.g. ".ics").
    #[arg(long, env = "MICROMETA_SUFFIX")]
    pub suffix: Option<String>,

    /// Write 2D tile coordinates.
    #[arg(long, default_value_t = false)]
    pub force_2d: bool,

    /// Keep tiles in project order instead of sorting by name.
    #[arg(long, default_value_t = false)]
    pub no_sort: bool,

    // =========================================================================
    // Stitching Parameters
    // =========================================================================
    /// Fusion method of the stitching plugin.
    #[arg(long, default_value = DEFAULT_FUSION_METHOD, env = "MICROMETA_FUSION_METHOD")]
    pub fusion_method: String,

    /// Regression threshold (0-1].
    #[arg(long, default_value_t = DEFAULT_REGRESSION_THRESHOLD)]
    pub regression_threshold: f64,

    /// Max/avg displacement threshold.
    #[arg(long, default_value_t = DEFAULT_MAX_AVG_DISPLACEMENT)]
    pub max_avg_displacement: f64,

    /// Absolute displacement threshold.
    #[arg(long, default_value_t = DEFAULT_ABS_DISPLACEMENT)]
    pub abs_displacement: f64,

    /// Use the tile positions as they are instead of computing the overlap.
    #[arg(long, default_value_t = false)]
    pub no_compute_overlap: bool,

    /// Enable subpixel accuracy.
    #[arg(long, default_value_t = false)]
    pub subpixel_accuracy: bool,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl StitchConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.template_file.is_none() && !BUILTIN_TEMPLATES.contains(&self.template.as_str()) {
            return Err(format!(
                "Unknown template '{}'. Use one of: {}, or --template-file",
                self.template,
                BUILTIN_TEMPLATES.join(", ")
            ));
        }

        if self.macro_name.trim().is_empty() || self.macro_name.contains(['/', '\\']) {
            return Err("macro_name must be a plain file name".to_string());
        }

        if let Some(ref suffix) = self.suffix {
            if suffix.is_empty() || suffix.contains(['/', '\\']) {
                return Err("suffix must be a non-empty file extension".to_string());
            }
        }

        self.stitching_options()
            .validate()
            .map_err(|e| e.to_string())
    }

    /// Stitching plugin parameters.
    pub fn stitching_options(&self) -> StitchingOptions {
        StitchingOptions {
            fusion_method: self.fusion_method.clone(),
            regression_threshold: self.regression_threshold,
            max_avg_displacement: self.max_avg_displacement,
            abs_displacement: self.abs_displacement,
            compute_overlap: !self.no_compute_overlap,
            subpixel_accuracy: self.subpixel_accuracy,
            output_dir: self.output_dir.clone(),
        }
    }

    /// Tile configuration options.
    pub fn tile_config_options(&self) -> TileConfigOptions {
        TileConfigOptions {
            force_2d: self.force_2d,
            sort: !self.no_sort,
            suffix: self.suffix.clone(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
