use std::ops::Index;

use serde::Serialize;
use tracing::debug;

use crate::io::StoragePath;

use super::mosaic::MosaicData;
use super::types::OverlapUnit;

/// Project-level information found in the experiment description.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperimentInfo {
    /// X axis direction (FluoView)
    pub x_direction: Option<String>,

    /// Y axis direction (FluoView)
    pub y_direction: Option<String>,

    /// Highest mosaic index reported by FluoView. This is NOT a count.
    pub highest_index: Option<u32>,

    /// Stage overlap in percent (FluoView 3000)
    pub overlap: Option<u32>,
}

/// A project containing one or more mosaic datasets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MosaicExperiment {
    /// The project file
    pub infile: StoragePath,

    /// Project-level information
    pub info: ExperimentInfo,

    mosaics: Vec<MosaicData>,
}

impl MosaicExperiment {
    /// Create an empty experiment for the given project file.
    pub fn new(infile: StoragePath) -> Self {
        debug!("Creating mosaic experiment for {}", infile.full.display());
        MosaicExperiment {
            infile,
            info: ExperimentInfo::default(),
            mosaics: Vec::new(),
        }
    }

    /// Add a mosaic dataset.
    pub fn add_dataset(&mut self, mosaic: MosaicData) {
        debug!("Adding mosaic dataset {:?}", mosaic.index);
        self.mosaics.push(mosaic);
    }

    pub fn len(&self) -> usize {
        self.mosaics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mosaics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MosaicData> {
        self.mosaics.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&MosaicData> {
        self.mosaics.get(idx)
    }

    pub fn mosaics(&self) -> &[MosaicData] {
        &self.mosaics
    }

    /// Generate a human readable summary of the experiment.
    pub fn summarize(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Mosaic experiment: {}", self.infile.full.display()));
        lines.push(format!("Number of mosaics: {}", self.mosaics.len()));

        for (i, mosaic) in self.mosaics.iter().enumerate() {
            let index = mosaic
                .index
                .map(|idx| idx.to_string())
                .unwrap_or_else(|| i.to_string());
            let overlap = match mosaic.get_overlap(OverlapUnit::Pct) {
                Ok(pct) => format!("{:.1}%", pct),
                Err(_) => "unknown".to_string(),
            };
            lines.push(format!(
                "- mosaic {}: {} x {} x {} tiles, {} overlap, {} sub-volumes",
                index,
                mosaic.grid.x,
                mosaic.grid.y,
                mosaic.grid.z,
                overlap,
                mosaic.len()
            ));
            if let Some(first) = mosaic.subvol.first() {
                lines.push(format!("  tile dimensions: {}", first.dimensions));
            }
        }

        lines.join("\n")
    }
}

impl Index<usize> for MosaicExperiment {
    type Output = MosaicData;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.mosaics[idx]
    }
}

impl<'a> IntoIterator for &'a MosaicExperiment {
    type Item = &'a MosaicData;
    type IntoIter = std::slice::Iter<'a, MosaicData>;

    fn into_iter(self) -> Self::IntoIter {
        self.mosaics.iter()
    }
}
