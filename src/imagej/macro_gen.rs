use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::dataset::MosaicExperiment;
use crate::error::MacroError;
use crate::io::{absolute_path, read_to_string, write_file};

use super::template::{escape_string, render, Variables};
use super::templates::builtin_template;
use super::tile_config::tile_config_names;

// =============================================================================
// Defaults
// =============================================================================

/// Default fusion method of the stitching plugin
pub const DEFAULT_FUSION_METHOD: &str = "Linear Blending";

/// Default regression threshold
pub const DEFAULT_REGRESSION_THRESHOLD: f64 = 0.30;

/// Default max/avg displacement threshold
pub const DEFAULT_MAX_AVG_DISPLACEMENT: f64 = 2.50;

/// Default absolute displacement threshold
pub const DEFAULT_ABS_DISPLACEMENT: f64 = 3.50;

const MACRO_TITLE: &str = "Fiji stitching macro";

// =============================================================================
// StitchingOptions
// =============================================================================

/// Parameters passed to the "Grid/Collection stitching" plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchingOptions {
    pub fusion_method: String,
    pub regression_threshold: f64,
    pub max_avg_displacement: f64,
    pub abs_displacement: f64,
    pub compute_overlap: bool,
    pub subpixel_accuracy: bool,

    /// Where fused images go. Defaults to the project directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for StitchingOptions {
    fn default() -> Self {
        Self {
            fusion_method: DEFAULT_FUSION_METHOD.to_string(),
            regression_threshold: DEFAULT_REGRESSION_THRESHOLD,
            max_avg_displacement: DEFAULT_MAX_AVG_DISPLACEMENT,
            abs_displacement: DEFAULT_ABS_DISPLACEMENT,
            compute_overlap: true,
            subpixel_accuracy: false,
            output_dir: None,
        }
    }
}

impl StitchingOptions {
    /// Check the thresholds.
    pub fn validate(&self) -> Result<(), MacroError> {
        if self.fusion_method.trim().is_empty() {
            return Err(MacroError::InvalidOptions(
                "fusion method must not be empty".to_string(),
            ));
        }
        let thresholds = [
            ("regression threshold", self.regression_threshold),
            ("max/avg displacement", self.max_avg_displacement),
            ("absolute displacement", self.abs_displacement),
        ];
        for (name, value) in thresholds {
            if value.is_nan() || value <= 0.0 {
                return Err(MacroError::InvalidOptions(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.regression_threshold > 1.0 {
            return Err(MacroError::InvalidOptions(format!(
                "regression threshold must be at most 1, got {}",
                self.regression_threshold
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Macro Generation
// =============================================================================

fn dir_string(path: &Path) -> Result<String, MacroError> {
    Ok(absolute_path(path)?.to_string_lossy().into_owned())
}

fn variables(experiment: &MosaicExperiment, opts: &StitchingOptions) -> Result<Variables, MacroError> {
    let input_dir = experiment.infile.path.as_path();
    let output_dir = opts.output_dir.as_deref().unwrap_or(input_dir);

    let tile_configs = tile_config_names(experiment)
        .iter()
        .map(|name| format!("\"{}\"", escape_string(name)))
        .collect::<Vec<_>>()
        .join(", ");

    let mut vars = Variables::new();
    vars.insert("title", MACRO_TITLE.to_string());
    vars.insert("project", escape_string(&experiment.infile.full.to_string_lossy()));
    vars.insert("version", env!("CARGO_PKG_VERSION").to_string());
    vars.insert("input_dir", escape_string(&dir_string(input_dir)?));
    vars.insert("output_dir", escape_string(&dir_string(output_dir)?));
    vars.insert("tile_configs", tile_configs);
    vars.insert("mosaic_count", experiment.len().to_string());
    vars.insert("fusion_method", escape_string(&opts.fusion_method));
    vars.insert("regression_threshold", format!("{:.2}", opts.regression_threshold));
    vars.insert("max_avg_displacement", format!("{:.2}", opts.max_avg_displacement));
    vars.insert("abs_displacement", format!("{:.2}", opts.abs_displacement));
    vars.insert("compute_overlap", opts.compute_overlap.to_string());
    vars.insert("subpixel_accuracy", opts.subpixel_accuracy.to_string());
    Ok(vars)
}

/// Generate stitching macro code from a built-in template.
pub fn gen_stitching_macro_code(
    experiment: &MosaicExperiment,
    template: &str,
    opts: &StitchingOptions,
) -> Result<String, MacroError> {
    let text = builtin_template(template)?;
    debug!("Using built-in template \"{}\".", template);
    gen_stitching_macro_code_from(experiment, text, opts)
}

/// Generate stitching macro code from template text.
pub fn gen_stitching_macro_code_from(
    experiment: &MosaicExperiment,
    template_text: &str,
    opts: &StitchingOptions,
) -> Result<String, MacroError> {
    if experiment.is_empty() {
        return Err(MacroError::EmptyExperiment);
    }
    opts.validate()?;
    render(template_text, &variables(experiment, opts)?)
}

/// Load a custom template file.
pub fn load_template_file(path: &Path) -> Result<String, MacroError> {
    debug!("Loading macro template {}", path.display());
    Ok(read_to_string(path)?)
}

/// Write macro code to `dir/fname` and return the path.
pub fn write_stitching_macro(code: &str, fname: &str, dir: &Path) -> Result<PathBuf, MacroError> {
    let path = dir.join(fname);
    write_file(&path, code)?;
    info!("Wrote stitching macro to {}", path.display());
    Ok(path)
}
