//! FluoView `MATL_Mosaic.log` projects with real OIF/OIB tiles.

use micrometa::format::{open_project, FluoViewMosaic};
use micrometa::{FormatError, ImageFormat, OverlapUnit};

use super::test_utils::*;

#[test]
fn test_2x2_oif_mosaic() {
    let dir = tempfile::tempdir().unwrap();
    let tiles = write_fluoview_2x2(dir.path(), 1, 512);
    let xml = fluoview_project_xml(1, &[fluoview_mosaic_xml(1, 2, 2, 95.0, &tiles)]);
    let project = write_bytes(dir.path(), "MATL_Mosaic.log", xml.as_bytes());

    let exp = open_project(&project).unwrap();
    assert_eq!(exp.len(), 1);
    assert_eq!(exp.info.x_direction.as_deref(), Some("LeftToRight"));
    assert_eq!(exp.info.highest_index, Some(1));

    let mosaic = &exp[0];
    assert_eq!(mosaic.index, Some(1));
    assert_eq!((mosaic.grid.x, mosaic.grid.y, mosaic.grid.z), (2, 2, 1));
    assert_close(mosaic.get_overlap(OverlapUnit::Pct).unwrap(), 5.0);
    assert_eq!(mosaic.len(), 4);

    let expected = [(0.0, 0.0), (486.4, 0.0), (0.0, 486.4), (486.4, 486.4)];
    for (tile, (ex, ey)) in mosaic.subvol.iter().zip(expected) {
        let (x, y) = tile.position.relative.unwrap();
        assert_close(x, ex);
        assert_close(y, ey);
        assert_eq!(tile.format, Some(ImageFormat::Oif));
        assert_eq!(tile.dimensions.x, 512);
        assert_eq!(tile.dimensions.z, 5);
    }
}

#[test]
fn test_tile_name_repaired() {
    let dir = tempfile::tempdir().unwrap();
    let tiles = write_fluoview_2x2(dir.path(), 1, 256);
    let xml = fluoview_project_xml(1, &[fluoview_mosaic_xml(1, 2, 2, 90.0, &tiles)]);
    let project = write_bytes(dir.path(), "MATL_Mosaic.log", xml.as_bytes());

    let exp = open_project(&project).unwrap();
    let first = &exp[0].subvol[0];
    assert_eq!(first.storage.dname, "Slide1sec001");
    assert_eq!(first.storage.fname, "Slide1sec001_01.oif");
    assert_eq!(first.index, Some(1));
    assert_eq!(first.position.stage, Some((Some(-1000.0), Some(2000.0))));
}

#[test]
fn test_missing_tile_drops_only_its_mosaic() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_fluoview_2x2(dir.path(), 1, 128);
    let mut broken = write_fluoview_2x2(dir.path(), 5, 128);
    broken[2].filename = fv_tile_name(99, "oif");

    let xml = fluoview_project_xml(
        2,
        &[
            fluoview_mosaic_xml(1, 2, 2, 90.0, &good),
            fluoview_mosaic_xml(2, 2, 2, 90.0, &broken),
        ],
    );
    let project = write_bytes(dir.path(), "MATL_Mosaic.log", xml.as_bytes());

    let exp = open_project(&project).unwrap();
    assert_eq!(exp.len(), 1);
    assert_eq!(exp[0].index, Some(1));
}

#[test]
fn test_oib_tiles() {
    let dir = tempfile::tempdir().unwrap();
    let mut tiles = Vec::new();
    for (n, xno) in [(1u32, 0u32), (2, 1)] {
        write_bytes(
            dir.path(),
            &fv_tile_disk_name(n, "oib"),
            &oib_bytes(&oif_text(1024, 1024, 3)),
        );
        tiles.push(FvTile {
            filename: fv_tile_name(n, "oib"),
            xno,
            yno: 0,
        });
    }
    let xml = fluoview_project_xml(1, &[fluoview_mosaic_xml(1, 2, 1, 80.0, &tiles)]);
    let project = write_bytes(dir.path(), "MATL_Mosaic.log", xml.as_bytes());

    let exp = open_project(&project).unwrap();
    let mosaic = &exp[0];
    assert_eq!(mosaic.len(), 2);
    assert_eq!(mosaic.subvol[1].format, Some(ImageFormat::Oib));
    let (x, _) = mosaic.subvol[1].position.relative.unwrap();
    assert_close(x, 819.2);
}

#[test]
fn test_unknown_tile_extension_fails_project() {
    let dir = tempfile::tempdir().unwrap();
    let tiles = vec![FvTile {
        filename: "Slide1sec001\\Slide1sec001.tif".to_string(),
        xno: 0,
        yno: 0,
    }];
    let xml = fluoview_project_xml(1, &[fluoview_mosaic_xml(1, 1, 1, 90.0, &tiles)]);
    let project = write_bytes(dir.path(), "MATL_Mosaic.log", xml.as_bytes());

    let err = open_project(&project).unwrap_err();
    assert!(matches!(err, FormatError::UnsupportedFormat { .. }));
}

#[test]
fn test_deferred_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let tiles = write_fluoview_2x2(dir.path(), 1, 64);
    let xml = fluoview_project_xml(1, &[fluoview_mosaic_xml(1, 2, 2, 90.0, &tiles)]);
    let project = write_bytes(dir.path(), "MATL_Mosaic.log", xml.as_bytes());

    let mut fv = FluoViewMosaic::open_with(&project, false).unwrap();
    assert!(fv.experiment().is_empty());
    assert_eq!(fv.potential_mosaics().unwrap(), 1);
    assert_eq!(fv.add_mosaics().unwrap(), 1);
    assert_eq!(fv.into_experiment().len(), 1);
}

#[test]
fn test_summarize() {
    let dir = tempfile::tempdir().unwrap();
    let tiles = write_fluoview_2x2(dir.path(), 1, 512);
    let xml = fluoview_project_xml(1, &[fluoview_mosaic_xml(1, 2, 2, 95.0, &tiles)]);
    let project = write_bytes(dir.path(), "MATL_Mosaic.log", xml.as_bytes());

    let summary = open_project(&project).unwrap().summarize();
    assert!(summary.contains("Number of mosaics: 1"));
    assert!(summary.contains("2 x 2 x 1 tiles"));
}
