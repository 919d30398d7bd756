//! Tile configurations and stitching macros for parsed projects.

use std::fs;

use micrometa::format::open_project;
use micrometa::imagej::{
    gen_stitching_macro_code, gen_tile_config, write_all_tile_configs, write_stitching_macro,
    StitchingOptions, TileConfigOptions,
};

use super::test_utils::*;

fn two_mosaic_project(dir: &std::path::Path) -> std::path::PathBuf {
    let first = write_fluoview_2x2(dir, 1, 512);
    let second = write_fluoview_2x2(dir, 5, 512);
    let xml = fluoview_project_xml(
        2,
        &[
            fluoview_mosaic_xml(1, 2, 2, 95.0, &first),
            fluoview_mosaic_xml(2, 2, 2, 95.0, &second),
        ],
    );
    write_bytes(dir, "MATL_Mosaic.log", xml.as_bytes())
}

#[test]
fn test_tile_config_for_2x2() {
    let dir = tempfile::tempdir().unwrap();
    let exp = open_project(&two_mosaic_project(dir.path())).unwrap();

    let config = gen_tile_config(&exp[0], &TileConfigOptions::default()).unwrap();
    let lines: Vec<_> = config.lines().collect();
    assert_eq!(lines[1], "dim = 3");
    assert_eq!(
        &lines[4..],
        &[
            "Slide1sec001/Slide1sec001_01.oif; ; (0.000000, 0.000000, 0.000000)",
            "Slide1sec002/Slide1sec002_01.oif; ; (486.400000, 0.000000, 0.000000)",
            "Slide1sec003/Slide1sec003_01.oif; ; (0.000000, 486.400000, 0.000000)",
            "Slide1sec004/Slide1sec004_01.oif; ; (486.400000, 486.400000, 0.000000)",
        ]
    );
}

#[test]
fn test_write_all_tile_configs() {
    let dir = tempfile::tempdir().unwrap();
    let exp = open_project(&two_mosaic_project(dir.path())).unwrap();

    let written = write_all_tile_configs(&exp, &TileConfigOptions::default()).unwrap();
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["mosaic_1.txt", "mosaic_2.txt"]);

    let text = fs::read_to_string(dir.path().join("mosaic_2.txt")).unwrap();
    assert!(text.contains("Slide1sec005/Slide1sec005_01.oif; ; "));
}

#[test]
fn test_stitching_macro() {
    let dir = tempfile::tempdir().unwrap();
    let exp = open_project(&two_mosaic_project(dir.path())).unwrap();

    let code = gen_stitching_macro_code(&exp, "stitching", &StitchingOptions::default()).unwrap();
    assert!(code.contains("newArray(\"mosaic_1.txt\", \"mosaic_2.txt\")"));
    assert!(code.contains("Grid/Collection stitching"));
    assert!(code.contains("saveAs(\"Tiff\""));

    let path = write_stitching_macro(&code, "stitch_all.ijm", dir.path()).unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), code);
}

#[test]
fn test_display_macro() {
    let dir = tempfile::tempdir().unwrap();
    let exp = open_project(&two_mosaic_project(dir.path())).unwrap();

    let opts = StitchingOptions {
        subpixel_accuracy: true,
        fusion_method: "Max. Intensity".to_string(),
        ..Default::default()
    };
    let code = gen_stitching_macro_code(&exp, "stitching_display", &opts).unwrap();
    assert!(code.contains("subpixel_accuracy = true;"));
    assert!(code.contains("fusion_method=[Max. Intensity]"));
    assert!(!code.contains("saveAs"));
}

#[test]
fn test_relative_project_path_resolves_dirs() {
    let dir = tempfile::tempdir().unwrap();
    two_mosaic_project(dir.path());

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let project_dir = std::env::current_dir().unwrap();
    let exp = open_project(std::path::Path::new("MATL_Mosaic.log"));
    let opts = StitchingOptions {
        output_dir: Some("fused".into()),
        ..Default::default()
    };
    let code = match &exp {
        Ok(exp) => Some(gen_stitching_macro_code(exp, "stitching", &opts)),
        Err(_) => None,
    };
    std::env::set_current_dir(previous).unwrap();

    let exp = exp.unwrap();
    assert!(exp.infile.full.is_absolute());
    assert_eq!(exp.infile.path, project_dir);

    let code = code.unwrap().unwrap();
    let input_dir = project_dir.to_string_lossy().replace('\\', "\\\\");
    let output_dir = project_dir.join("fused").to_string_lossy().replace('\\', "\\\\");
    assert!(code.contains(&format!("input_dir = \"{}\";", input_dir)));
    assert!(code.contains(&format!("output_dir = \"{}\";", output_dir)));
    assert!(!code.contains("input_dir = \".\";"));
}
