//! FluoView 3000 `matl.omp2info` projects with OIR tiles.

use micrometa::format::{open_project, FluoView3kMosaic};
use micrometa::{ImageFormat, OverlapUnit};

use super::test_utils::*;

fn write_areas(dir: &std::path::Path, prefix: &str, nx: u32, ny: u32, size: u32) -> Vec<Fv3kArea> {
    let mut areas = Vec::new();
    for y in 0..ny {
        for x in 0..nx {
            let image = format!("{}_A01_G001_{:04}.oir", prefix, y * nx + x + 1);
            write_bytes(dir, &image, &oir_bytes(size, size, 11));
            areas.push(Fv3kArea { image, x, y });
        }
    }
    areas
}

#[test]
fn test_matrix_roi_mosaic() {
    let dir = tempfile::tempdir().unwrap();
    let areas = write_areas(dir.path(), "Tile", 3, 2, 1024);
    let xml = fv3k_project_xml(
        10,
        &[fv3k_group_xml("g1", "matl:DefineMatrixROI", true, 3, 2, &areas)],
    );
    let project = write_bytes(dir.path(), "matl.omp2info", xml.as_bytes());

    let exp = open_project(&project).unwrap();
    assert_eq!(exp.info.overlap, Some(10));
    assert_eq!(exp.len(), 1);

    let mosaic = &exp[0];
    assert_eq!(mosaic.index, Some(0));
    assert_eq!(mosaic.object_id.as_deref(), Some("g1"));
    assert_eq!(mosaic.group_id.as_deref(), Some("g1-protocol"));
    assert_eq!((mosaic.grid.x, mosaic.grid.y), (3, 2));
    assert_close(mosaic.get_overlap(OverlapUnit::Pct).unwrap(), 10.0);
    assert_eq!(mosaic.len(), 6);

    let last = &mosaic.subvol[5];
    assert_eq!(last.format, Some(ImageFormat::Oir));
    assert_eq!(last.dimensions.x, 1024);
    assert_eq!(last.dimensions.z, 11);
    assert_eq!(last.dimensions.b, 16);
    assert_eq!(last.position.stage, Some((None, None)));
    let (x, y) = last.position.relative.unwrap();
    assert_close(x, 1843.2);
    assert_close(y, 921.6);
}

#[test]
fn test_group_filtering() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_areas(dir.path(), "A", 2, 1, 256);
    let b = write_areas(dir.path(), "B", 2, 1, 256);
    let c = write_areas(dir.path(), "C", 1, 1, 256);
    let mut missing = write_areas(dir.path(), "D", 2, 1, 256);
    missing[1].image = "D_does_not_exist.oir".to_string();

    let xml = fv3k_project_xml(
        15,
        &[
            fv3k_group_xml("a", "matl:DefineMatrixROI", true, 2, 1, &a),
            fv3k_group_xml("point", "matl:DefinePointROI", true, 1, 1, &c),
            fv3k_group_xml("b", "matl:MosaicROI", false, 2, 1, &b),
            fv3k_group_xml("d", "matl:MosaicROI", true, 2, 1, &missing),
            fv3k_group_xml("c", "matl:MosaicROI", true, 1, 1, &c),
        ],
    );
    let project = write_bytes(dir.path(), "matl.omp2info", xml.as_bytes());

    let mut fv3k = FluoView3kMosaic::open_with(&project, false).unwrap();
    assert_eq!(fv3k.potential_mosaics().unwrap(), 4);
    assert_eq!(fv3k.add_mosaics().unwrap(), 2);

    let exp = fv3k.into_experiment();
    let ids: Vec<_> = exp.iter().map(|m| m.object_id.clone().unwrap()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    // Indices count all Matrix/Mosaic ROI groups, skipped ones included
    assert_eq!(exp[0].index, Some(0));
    assert_eq!(exp[1].index, Some(3));
}
