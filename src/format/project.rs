use std::path::Path;

use tracing::info;

use crate::dataset::MosaicExperiment;
use crate::error::FormatError;
use crate::io::{absolute_path, StoragePath};

use super::detect::{detect_project_format, ProjectFormat};
use super::fluoview::FluoViewMosaic;
use super::fluoview3k::FluoView3kMosaic;
use super::xml::read_xml_text;

/// Open a project file of any supported format and parse all mosaics.
///
/// Relative paths are resolved against the working directory, so the
/// experiment always refers to its files by absolute path.
pub fn open_project(path: &Path) -> Result<MosaicExperiment, FormatError> {
    let path = absolute_path(path)?;
    let path = path.as_path();
    let text = read_xml_text(path)?;
    let format = detect_project_format(&text)?;
    info!("Reading {} project: {}", format.name(), path.display());

    let infile = StoragePath::from_path(path);
    let experiment = match format {
        ProjectFormat::FluoViewMosaic => {
            FluoViewMosaic::from_xml(infile, text, true)?.into_experiment()
        }
        ProjectFormat::FluoView3kMosaic => {
            FluoView3kMosaic::from_xml(infile, text, true)?.into_experiment()
        }
    };

    info!("Project contains {} usable mosaics.", experiment.len());
    Ok(experiment)
}
