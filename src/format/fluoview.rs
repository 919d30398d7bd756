//! Reader for FluoView mosaic projects (`MATL_Mosaic.log`).
//!
//! FluoView writes one XML log per tiled project ("MATL" is short for
//! Multi Area Time Lapse). It holds a few generic settings followed by one
//! `Mosaic` element per mosaic, each listing its tiles with file name,
//! stage position and grid index:
//!
//! ```text
//! XYStage
//! ├── XAxisDirection / YAxisDirection / NumberOfMosaics
//! └── Mosaic No="1"
//!     ├── XScanDirection / YScanDirection / XImages / YImages / IndexRatio
//!     └── ImageInfo (per tile)
//!         └── No / Filename / XPos / YPos / Xno / Yno
//! ```
//!
//! The tiles themselves are OIF or OIB files, opened to read their
//! dimensions.

use std::path::Path;

use roxmltree::{Document, Node};
use tracing::{info, warn};

use crate::dataset::{MosaicData, MosaicExperiment, MosaicGrid, OverlapUnit, StorageType};
use crate::error::{FormatError, ParseError};
use crate::io::StoragePath;

use super::detect::{ImageFormat, FLUOVIEW_ROOT_TAG};
use super::olympus::open_image;
use super::xml::{attribute, child_parse, child_text, children, read_xml_text};

const SUPPORTED_X_DIRECTION: &str = "LeftToRight";
const SUPPORTED_Y_DIRECTION: &str = "TopToBottom";

/// A tiled project from Olympus FluoView.
#[derive(Debug, Clone)]
pub struct FluoViewMosaic {
    xml: String,
    experiment: MosaicExperiment,
}

impl FluoViewMosaic {
    /// Read a project file and parse all of its mosaics.
    pub fn open(path: &Path) -> Result<Self, FormatError> {
        Self::open_with(path, true)
    }

    /// Read a project file, parsing the mosaics only if `run_parser` is set.
    ///
    /// Without the parser the XML is validated and the mosaics can be added
    /// later through [`FluoViewMosaic::add_mosaics`].
    pub fn open_with(path: &Path, run_parser: bool) -> Result<Self, FormatError> {
        let text = read_xml_text(path)?;
        Self::from_xml(StoragePath::from_path(path), text, run_parser)
    }

    /// Build the project from XML text. `infile` locates the tile files.
    pub fn from_xml(
        infile: StoragePath,
        xml: String,
        run_parser: bool,
    ) -> Result<Self, FormatError> {
        let mut project = FluoViewMosaic {
            xml,
            experiment: MosaicExperiment::new(infile),
        };
        project.validate()?;
        info!(
            "Found {} potential mosaics in XML.",
            project.potential_mosaics()?
        );
        if run_parser {
            project.add_mosaics()?;
        }
        Ok(project)
    }

    fn validate(&mut self) -> Result<(), FormatError> {
        info!("Validating FluoView Mosaic XML...");
        let doc = Document::parse(&self.xml).map_err(ParseError::from)?;
        let root = doc.root_element();
        if root.tag_name().name() != FLUOVIEW_ROOT_TAG || root.tag_name().namespace().is_some() {
            return Err(FormatError::InvalidProject {
                reason: format!("Unexpected root element: {}", root.tag_name().name()),
            });
        }

        let x_dir = child_text(root, (None, "XAxisDirection"))?;
        let y_dir = child_text(root, (None, "YAxisDirection"))?;
        let highest_index: u32 = child_parse(root, (None, "NumberOfMosaics"))?;
        if x_dir != SUPPORTED_X_DIRECTION || y_dir != SUPPORTED_Y_DIRECTION {
            return Err(FormatError::InvalidProject {
                reason: format!("Unsupported axis configuration: {} / {}", x_dir, y_dir),
            });
        }

        let info = &mut self.experiment.info;
        info.x_direction = Some(x_dir.to_string());
        info.y_direction = Some(y_dir.to_string());
        info.highest_index = Some(highest_index);
        info!("Finished validating XML.");
        Ok(())
    }

    /// Number of `Mosaic` elements in the project.
    pub fn potential_mosaics(&self) -> Result<usize, FormatError> {
        let doc = Document::parse(&self.xml).map_err(ParseError::from)?;
        Ok(children(doc.root_element(), (None, "Mosaic")).count())
    }

    /// Parse all `Mosaic` elements and add the complete ones.
    ///
    /// A mosaic with a missing or unreadable tile is skipped as a whole.
    /// Returns the number of mosaics added.
    pub fn add_mosaics(&mut self) -> Result<usize, FormatError> {
        let doc = Document::parse(&self.xml).map_err(ParseError::from)?;
        let mut added = 0;
        for node in children(doc.root_element(), (None, "Mosaic")) {
            if let Some(mosaic) = self.parse_mosaic(node)? {
                self.experiment.add_dataset(mosaic);
                added += 1;
            }
        }
        Ok(added)
    }

    fn parse_mosaic(&self, node: Node<'_, '_>) -> Result<Option<MosaicData>, FormatError> {
        let idx_text = attribute(node, (None, "No"))?;
        let idx: u32 = idx_text.trim().parse().map_err(|_| ParseError::InvalidValue {
            field: "Mosaic/@No".to_string(),
            value: idx_text.to_string(),
        })?;

        let x_scan = child_text(node, (None, "XScanDirection"))?;
        let y_scan = child_text(node, (None, "YScanDirection"))?;
        if x_scan != SUPPORTED_X_DIRECTION || y_scan != SUPPORTED_Y_DIRECTION {
            return Err(FormatError::InvalidProject {
                reason: format!(
                    "Mosaic {}: unsupported scan direction {} / {}",
                    idx, x_scan, y_scan
                ),
            });
        }

        let grid = MosaicGrid {
            x: child_parse(node, (None, "XImages"))?,
            y: child_parse(node, (None, "YImages"))?,
            z: 1,
        };
        let index_ratio: f64 = child_parse(node, (None, "IndexRatio"))?;

        let infile = &self.experiment.infile;
        let mut mosaic = MosaicData::new(StorageType::Tree, infile.clone(), grid);
        mosaic.set_overlap(100.0 - index_ratio, OverlapUnit::Pct);
        mosaic.index = Some(idx);
        let overlap = mosaic.get_overlap(OverlapUnit::Pct)?;

        for img in children(node, (None, "ImageInfo")) {
            let fname = child_text(img, (None, "Filename"))?;
            let storage = infile.join(fname);
            match ImageFormat::from_extension(&storage.ext) {
                Some(ImageFormat::Oif) | Some(ImageFormat::Oib) => {}
                _ => {
                    return Err(FormatError::UnsupportedFormat {
                        reason: format!("Unknown dataset type: {}.", fname),
                    })
                }
            }

            let stage_x: f64 = child_parse(img, (None, "XPos"))?;
            let stage_y: f64 = child_parse(img, (None, "YPos"))?;
            let tile_x: u32 = child_parse(img, (None, "Xno"))?;
            let tile_y: u32 = child_parse(img, (None, "Yno"))?;
            let tile_idx: u32 = child_parse(img, (None, "No"))?;

            let mut tile = match open_image(&storage) {
                Ok(tile) => tile,
                Err(err) => {
                    info!("Broken/missing image data: {}", err);
                    warn!("Mosaic {}: incomplete subvolumes, SKIPPING!", idx);
                    warn!("First incomplete/missing subvolume: {}", fname);
                    return Ok(None);
                }
            };
            tile.set_stage_coords((Some(stage_x), Some(stage_y)));
            tile.set_tile_numbers(tile_x, tile_y, None);
            tile.set_relative_position(overlap)?;
            tile.index = Some(tile_idx);
            mosaic.add_subvol(tile);
        }

        Ok(Some(mosaic))
    }

    /// The experiment built so far.
    pub fn experiment(&self) -> &MosaicExperiment {
        &self.experiment
    }

    pub fn into_experiment(self) -> MosaicExperiment {
        self.experiment
    }
}
