//! Format readers for Olympus FluoView data.
//!
//! Two layers are involved:
//!
//! - **Project files** describe tiled experiments: FluoView
//!   `MATL_Mosaic.log` ([`FluoViewMosaic`]) and FluoView 3000
//!   `matl.omp2info` ([`FluoView3kMosaic`]).
//! - **Image files** carry the per-tile metadata: OIF, OIB and OIR, see
//!   [`olympus`].
//!
//! # Format Detection
//!
//! Use [`open_project`] to read a project of either kind; the format is
//! picked from the XML root element. Image formats are identified by
//! extension with [`detect_image_format`].

pub mod detect;
pub mod fluoview;
pub mod fluoview3k;
pub mod ini;
pub mod olympus;
mod project;
pub mod xml;

pub use detect::{
    detect_image_format, detect_project_format, is_ole_header, is_oir_header, ImageFormat,
    ProjectFormat,
};
pub use fluoview::FluoViewMosaic;
pub use fluoview3k::FluoView3kMosaic;
pub use ini::IniDocument;
pub use olympus::{open_image, MetadataReader, OibReader, OifReader, OirReader};
pub use project::open_project;
