//! ImageJ / Fiji macro generation.
//!
//! Produces the inputs for Fiji's "Grid/Collection stitching" plugin:
//!
//! ```text
//! MosaicExperiment
//!   ├── mosaic_1.txt, mosaic_2.txt, ...   tile configurations
//!   └── stitch_all.ijm                     macro running the plugin
//! ```
//!
//! The macro is rendered from a template ([`templates`]) with `${name}`
//! placeholders ([`template`]).

mod macro_gen;
pub mod template;
pub mod templates;
mod tile_config;

pub use macro_gen::{
    gen_stitching_macro_code, gen_stitching_macro_code_from, load_template_file,
    write_stitching_macro, StitchingOptions, DEFAULT_ABS_DISPLACEMENT, DEFAULT_FUSION_METHOD,
    DEFAULT_MAX_AVG_DISPLACEMENT, DEFAULT_REGRESSION_THRESHOLD,
};
pub use templates::{builtin_template, BUILTIN_TEMPLATES};
pub use tile_config::{
    gen_tile_config, pad_length, tile_config_name, tile_config_names, write_all_tile_configs,
    write_tile_config, TileConfigOptions,
};
