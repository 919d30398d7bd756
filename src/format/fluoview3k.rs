//! Reader for FluoView 3000 mosaic projects (`matl.omp2info`).
//!
//! The project XML lives in the MATL namespace. After a few generic
//! settings (stage, overlap) every mosaic is described as a `matl:group`
//! with little more than the tile grid and the OIR file of every tile.
//! Tile dimensions come from the OIR files themselves.

use std::path::Path;

use roxmltree::{Document, Node};
use tracing::{debug, info, warn};

use crate::dataset::{ImageData, MosaicData, MosaicExperiment, MosaicGrid, OverlapUnit, StorageType};
use crate::error::{FormatError, ParseError};
use crate::io::StoragePath;

use super::detect::FLUOVIEW3K_ROOT_TAG;
use super::olympus::open_image;
use super::xml::{
    attribute, child, child_parse, child_text, children, ns, read_xml_text, source_text, xsi_type,
    XmlName,
};

/// Supported `version` attribute of the root element.
pub const SUPPORTED_VERSION: &str = "2.2";

/// The only stage this reader knows about.
pub const SUPPORTED_STAGE: &str = "PRIOR,H101F";

const MOSAIC_GROUP_TYPES: [&str; 2] = ["matl:DefineMatrixROI", "matl:MosaicROI"];
const REGION_TYPES: [&str; 2] = ["marker:rectangleRegion", "marker:polygonRegion"];
const REGION_SHAPES: [&str; 2] = ["Rectangle", "Polygon"];

const fn matl(name: &'static str) -> XmlName {
    (Some(ns::MATL), name)
}

const fn marker(name: &'static str) -> XmlName {
    (Some(ns::MARKER), name)
}

/// A tiled project from Olympus FluoView 3000.
#[derive(Debug, Clone)]
pub struct FluoView3kMosaic {
    xml: String,
    overlap: u32,
    experiment: MosaicExperiment,
}

impl FluoView3kMosaic {
    /// Read a project file and parse all of its mosaics.
    pub fn open(path: &Path) -> Result<Self, FormatError> {
        Self::open_with(path, true)
    }

    /// Read a project file, parsing the mosaics only if `run_parser` is set.
    pub fn open_with(path: &Path, run_parser: bool) -> Result<Self, FormatError> {
        let text = read_xml_text(path)?;
        Self::from_xml(StoragePath::from_path(path), text, run_parser)
    }

    /// Build the project from XML text. `infile` locates the OIR files.
    pub fn from_xml(
        infile: StoragePath,
        xml: String,
        run_parser: bool,
    ) -> Result<Self, FormatError> {
        let mut project = FluoView3kMosaic {
            xml,
            overlap: 0,
            experiment: MosaicExperiment::new(infile),
        };
        project.validate()?;
        if run_parser {
            project.add_mosaics()?;
        }
        Ok(project)
    }

    fn validate(&mut self) -> Result<(), FormatError> {
        info!(
            "Validating FluoView 3000 MATL XML ({})",
            self.experiment.infile.full.display()
        );
        let doc = Document::parse(&self.xml).map_err(ParseError::from)?;
        let root = doc.root_element();
        let tag = root.tag_name();
        if tag.namespace() != Some(ns::MATL) || tag.name() != FLUOVIEW3K_ROOT_TAG {
            return Err(FormatError::InvalidProject {
                reason: format!("Invalid XML root tag: {}", tag.name()),
            });
        }

        let version = attribute(root, (None, "version"))?;
        debug!("Multi Area Time Lapse properties:");
        debug!(" - version: {}", version);
        for name in ["applicationVersion", "platformVersion", "id"] {
            debug!(" - {}: {}", name, root.attribute(name).unwrap_or("-"));
        }
        if version != SUPPORTED_VERSION {
            return Err(FormatError::InvalidProject {
                reason: format!("Unknown properties version: {}", version),
            });
        }

        let stage = child(root, matl("stage"))?;
        let stage_name = child_text(stage, matl("name"))?;
        if stage_name != SUPPORTED_STAGE {
            return Err(FormatError::InvalidProject {
                reason: format!("Unknown stage found: {}", stage_name),
            });
        }
        debug!("Correct stage found ({}).", stage_name);

        self.overlap = child_parse(stage, matl("overlap"))?;
        debug!("Found stage overlap to be {}.", self.overlap);
        self.experiment.info.overlap = Some(self.overlap);

        info!("Finished validating XML.");
        Ok(())
    }

    /// Number of Matrix or Mosaic ROI groups in the project.
    pub fn potential_mosaics(&self) -> Result<usize, FormatError> {
        let doc = Document::parse(&self.xml).map_err(ParseError::from)?;
        Ok(mosaic_groups(doc.root_element())?.len())
    }

    /// Parse all ROI groups and add the usable ones.
    ///
    /// Returns the number of mosaics added.
    pub fn add_mosaics(&mut self) -> Result<usize, FormatError> {
        let doc = Document::parse(&self.xml).map_err(ParseError::from)?;
        let groups = mosaic_groups(doc.root_element())?;
        info!("Found {} Matrix ROIs (tiling datasets).", groups.len());

        let mut added = 0;
        for (i, group) in groups.into_iter().enumerate() {
            match self.parse_mosaic(group)? {
                Some(mut mosaic) => {
                    mosaic.index = Some(i as u32);
                    self.experiment.add_dataset(mosaic);
                    added += 1;
                }
                None => warn!("Error parsing mosaic from group {}, SKIPPING!", i),
            }
        }
        Ok(added)
    }

    fn parse_mosaic(&self, group: Node<'_, '_>) -> Result<Option<MosaicData>, FormatError> {
        let oid = attribute(group, (None, "objectId"))?;
        info!("Processing ROI group {}...", oid);

        let region = child(group, marker("regionInfo"))?;
        let region_type = xsi_type(region)?;
        if !REGION_TYPES.contains(&region_type) {
            warn!("Unsupported region type \"{}\", skipping.", region_type);
            return Ok(None);
        }
        let shape = child_text(region, marker("shape"))?;
        if !REGION_SHAPES.contains(&shape) {
            return Err(FormatError::InvalidProject {
                reason: format!("Group {}: unexpected region shape {}", oid, shape),
            });
        }
        debug!("Region shape: {}", shape);

        if child_text(group, matl("enable"))? != "true" {
            warn!("Group is marked as \"disabled\", skipping.");
            return Ok(None);
        }
        let gid = child_text(group, matl("protocolGroupId"))?;
        debug!(" - group ID: \"{}\"", gid);

        let area_info = child(group, matl("areaInfo"))?;
        let grid = MosaicGrid {
            x: child_parse(area_info, matl("numOfXAreas"))?,
            y: child_parse(area_info, matl("numOfYAreas"))?,
            z: 1,
        };
        debug!(" - number of areas X / Y: {} / {}", grid.x, grid.y);
        debug!(
            " - tile size: {} x {} nm",
            child_text(area_info, matl("areaWidth"))?,
            child_text(area_info, matl("areaHeight"))?
        );

        let mut mosaic = MosaicData::new(StorageType::Tree, self.experiment.infile.clone(), grid);
        mosaic.set_overlap(f64::from(self.overlap), OverlapUnit::Pct);
        mosaic.object_id = Some(oid.to_string());
        mosaic.group_id = Some(gid.to_string());

        let areas: Vec<_> = children(group, matl("area")).collect();
        info!("Found {} area sections (i.e. tiles).", areas.len());
        for area in areas {
            match self.parse_area(area) {
                Ok(tile) => mosaic.add_subvol(tile),
                Err(err) => {
                    info!("Group \"{}\" has broken image data: {}", oid, err);
                    info!("Corresponding XML section:\n----\n{}\n----", source_text(area));
                    return Ok(None);
                }
            }
        }

        Ok(Some(mosaic))
    }

    fn parse_area(&self, area: Node<'_, '_>) -> Result<ImageData, FormatError> {
        let fname = child_text(area, matl("image"))?;
        let grid_x: u32 = child_parse(area, matl("xIndex"))?;
        let grid_y: u32 = child_parse(area, matl("yIndex"))?;
        info!("File \"{}\" grid position: {} / {}", fname, grid_x, grid_y);

        let mut tile = open_image(&self.experiment.infile.join(fname))?;
        // No stage coordinates in FluoView 3000 projects
        tile.set_stage_coords((None, None));
        tile.set_tile_numbers(grid_x, grid_y, None);
        tile.set_relative_position(f64::from(self.overlap))?;

        debug!(
            "Parsed area \"{}\", position: {:?}",
            fname, tile.position.relative
        );
        Ok(tile)
    }

    /// The experiment built so far.
    pub fn experiment(&self) -> &MosaicExperiment {
        &self.experiment
    }

    pub fn into_experiment(self) -> MosaicExperiment {
        self.experiment
    }
}

fn mosaic_groups<'a, 'input>(root: Node<'a, 'input>) -> Result<Vec<Node<'a, 'input>>, ParseError> {
    debug!("Looking for Matrix ROI groups (tiling datasets).");
    let mut groups = Vec::new();
    for group in children(root, matl("group")) {
        let group_type = xsi_type(group)?;
        if MOSAIC_GROUP_TYPES.contains(&group_type) {
            debug!(
                "Group {} is a {}.",
                group.attribute("objectId").unwrap_or("?"),
                group_type
            );
            groups.push(group);
        }
    }
    Ok(groups)
}
