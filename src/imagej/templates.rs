//! Built-in ImageJ macro templates.

use crate::error::MacroError;

/// Fuse every mosaic and save it as TIFF next to its tile configuration.
pub const STITCHING: &str = r##"// ${title}
// project: ${project}
// generated by micrometa ${version}

input_dir = "${input_dir}";
output_dir = "${output_dir}";
tile_configs = newArray(${tile_configs});
compute_overlap = ${compute_overlap};
subpixel_accuracy = ${subpixel_accuracy};

setBatchMode(true);
for (i = 0; i < tile_configs.length; i++) {
    print("Stitching " + tile_configs[i] + " (" + (i + 1) + "/${mosaic_count})");
    params = "type=[Positions from file] order=[Defined by TileConfiguration]";
    params = params + " directory=[" + input_dir + "]";
    params = params + " layout_file=" + tile_configs[i];
    params = params + " fusion_method=[${fusion_method}]";
    params = params + " regression_threshold=${regression_threshold}";
    params = params + " max/avg_displacement_threshold=${max_avg_displacement}";
    params = params + " absolute_displacement_threshold=${abs_displacement}";
    if (compute_overlap)
        params = params + " compute_overlap";
    if (subpixel_accuracy)
        params = params + " subpixel_accuracy";
    params = params + " computation_parameters=[Save computation time (but use more RAM)]";
    params = params + " image_output=[Fuse and display]";
    run("Grid/Collection stitching", params);

    fused = replace(tile_configs[i], ".txt", ".tif");
    saveAs("Tiff", output_dir + File.separator + fused);
    close();
}
setBatchMode(false);
print("Finished stitching ${mosaic_count} mosaics.");
"##;

/// Fuse every mosaic and leave the results open in Fiji.
pub const STITCHING_DISPLAY: &str = r##"// ${title}
// project: ${project}
// generated by micrometa ${version}

input_dir = "${input_dir}";
tile_configs = newArray(${tile_configs});
compute_overlap = ${compute_overlap};
subpixel_accuracy = ${subpixel_accuracy};

for (i = 0; i < tile_configs.length; i++) {
    print("Stitching " + tile_configs[i] + " (" + (i + 1) + "/${mosaic_count})");
    params = "type=[Positions from file] order=[Defined by TileConfiguration]";
    params = params + " directory=[" + input_dir + "]";
    params = params + " layout_file=" + tile_configs[i];
    params = params + " fusion_method=[${fusion_method}]";
    params = params + " regression_threshold=${regression_threshold}";
    params = params + " max/avg_displacement_threshold=${max_avg_displacement}";
    params = params + " absolute_displacement_threshold=${abs_displacement}";
    if (compute_overlap)
        params = params + " compute_overlap";
    if (subpixel_accuracy)
        params = params + " subpixel_accuracy";
    params = params + " computation_parameters=[Save computation time (but use more RAM)]";
    params = params + " image_output=[Fuse and display]";
    run("Grid/Collection stitching", params);
    rename(replace(tile_configs[i], ".txt", ""));
}
"##;

/// Names of the built-in templates.
pub const BUILTIN_TEMPLATES: [&str; 2] = ["stitching", "stitching_display"];

/// Look up a built-in template by name.
pub fn builtin_template(name: &str) -> Result<&'static str, MacroError> {
    match name {
        "stitching" => Ok(STITCHING),
        "stitching_display" => Ok(STITCHING_DISPLAY),
        other => Err(MacroError::UnknownTemplate(other.to_string())),
    }
}
