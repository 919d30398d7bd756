//! Test utilities for integration tests.
//!
//! Helpers to build Olympus image files (OIF, OIB, OIR) and project XML in
//! memory and write them into temporary directories.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use cfb::CompoundFile;

use micrometa::format::xml::ns;

// =============================================================================
// Image Files
// =============================================================================

/// Encode text as UTF-16 LE with a byte order mark, as FluoView does.
pub fn utf16le(text: &str) -> Vec<u8> {
    let mut out = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

/// INI description of an OIF/OIB image.
pub fn oif_text(width: u32, height: u32, z: u32) -> String {
    format!(
        "[Reference Image Parameter]\r\n\
         ImageWidth={}\r\n\
         ImageHeight={}\r\n\
         ValidBitCounts=12\r\n\
         \r\n\
         [Axis 2 Parameters Common]\r\n\
         AxisName=\"Ch\"\r\n\
         MaxSize=2\r\n\
         \r\n\
         [Axis 3 Parameters Common]\r\n\
         AxisName=\"Z\"\r\n\
         MaxSize={}\r\n\
         \r\n\
         [Axis 4 Parameters Common]\r\n\
         AxisName=\"T\"\r\n\
         MaxSize=1\r\n",
        width, height, z
    )
}

/// Build an OIB container holding the given main INI description.
pub fn oib_bytes(main: &str) -> Vec<u8> {
    let mut comp = CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    let info = "[OibSaveInfo]\r\nVersion=2.0.0.0\r\nMainFileName=Storage00001\\Stream00001\r\n";
    comp.create_stream("/OibInfo.txt")
        .unwrap()
        .write_all(&utf16le(info))
        .unwrap();
    comp.create_storage("/Storage00001").unwrap();
    comp.create_stream("/Storage00001/Stream00001")
        .unwrap()
        .write_all(&utf16le(main))
        .unwrap();
    comp.flush().unwrap();
    comp.into_inner().into_inner()
}

/// Build an OIR file with frameProperties and imageProperties blocks.
pub fn oir_bytes(width: u32, height: u32, z: u32) -> Vec<u8> {
    let frame = format!(
        "<?xml version=\"1.0\" encoding=\"ASCII\"?>\
         <lsmframe:frameProperties xmlns:lsmframe=\"http://www.olympus.co.jp/hpf/model/lsmframe\" \
         xmlns:commonframe=\"{}\" xmlns:base=\"{}\">\
         <commonframe:imageDefinition><base:width>{}</base:width>\
         <base:height>{}</base:height><base:bitCounts>16</base:bitCounts>\
         </commonframe:imageDefinition></lsmframe:frameProperties>",
        ns::COMMONFRAME,
        ns::BASE,
        width,
        height
    );
    let image = format!(
        "<?xml version=\"1.0\" encoding=\"ASCII\"?>\
         <lsmimage:imageProperties xmlns:lsmimage=\"http://www.olympus.co.jp/hpf/model/lsmimage\" \
         xmlns:commonimage=\"{}\" xmlns:commonparam=\"{}\" xmlns:xsi=\"{}\">\
         <commonimage:acquisition><commonimage:imagingParam>\
         <commonparam:axis xsi:type=\"commonparam:ZAxisParam\">\
         <commonparam:paramName>Start End</commonparam:paramName>\
         <commonparam:maxSize>{}</commonparam:maxSize></commonparam:axis>\
         </commonimage:imagingParam></commonimage:acquisition></lsmimage:imageProperties>",
        ns::COMMONIMAGE,
        ns::COMMONPARAM,
        ns::XSI,
        z
    );

    let mut bytes = b"OLYMPUSRAWFORMAT\x00\x00\x00\x02".to_vec();
    bytes.extend_from_slice(&[0u8; 64]);
    bytes.extend_from_slice(frame.as_bytes());
    bytes.extend_from_slice(&[0x00, 0x01, 0x02, 0x03]);
    // pixel data stand-in
    bytes.extend((0..4096u32).map(|i| (i % 7) as u8));
    bytes.extend_from_slice(image.as_bytes());
    bytes.extend_from_slice(&[0x00, 0xff]);
    bytes
}

/// Write `bytes` to `dir/rel`, creating parent directories.
pub fn write_bytes(dir: &Path, rel: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    path
}

// =============================================================================
// FluoView Projects
// =============================================================================

/// One tile of a FluoView mosaic.
pub struct FvTile {
    pub filename: String,
    pub xno: u32,
    pub yno: u32,
}

/// FluoView tile names as written into the log, e.g.
/// `Slide1sec003\Slide1sec003.oif`.
pub fn fv_tile_name(no: u32, ext: &str) -> String {
    format!("Slide1sec{:03}\\Slide1sec{:03}.{}", no, no, ext)
}

/// The same tile as stored on disk, with the `_01` suffix.
pub fn fv_tile_disk_name(no: u32, ext: &str) -> String {
    format!("Slide1sec{:03}/Slide1sec{:03}_01.{}", no, no, ext)
}

pub fn fluoview_mosaic_xml(no: u32, nx: u32, ny: u32, index_ratio: f64, tiles: &[FvTile]) -> String {
    let mut xml = format!(
        "<Mosaic No=\"{}\">\
         <XScanDirection>LeftToRight</XScanDirection>\
         <YScanDirection>TopToBottom</YScanDirection>\
         <XImages>{}</XImages><YImages>{}</YImages>\
         <IndexRatio>{:.1}</IndexRatio>",
        no, nx, ny, index_ratio
    );
    for (i, tile) in tiles.iter().enumerate() {
        xml.push_str(&format!(
            "<ImageInfo><No>{}</No><Filename>{}</Filename>\
             <XPos>{:.1}</XPos><YPos>{:.1}</YPos><Xno>{}</Xno><Yno>{}</Yno></ImageInfo>",
            i + 1,
            tile.filename,
            -1000.0 + 450.0 * f64::from(tile.xno),
            2000.0 + 450.0 * f64::from(tile.yno),
            tile.xno,
            tile.yno
        ));
    }
    xml.push_str("</Mosaic>");
    xml
}

pub fn fluoview_project_xml(highest_index: u32, mosaics: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"ASCII\"?>\r\n\
         <XYStage>\
         <XAxisDirection>LeftToRight</XAxisDirection>\
         <YAxisDirection>TopToBottom</YAxisDirection>\
         <NumberOfMosaics>{}</NumberOfMosaics>{}</XYStage>",
        highest_index,
        mosaics.concat()
    )
}

/// Write a 2x2 OIF mosaic with index `no` and tiles numbered from
/// `first_tile`. Returns the tile specs.
pub fn write_fluoview_2x2(dir: &Path, first_tile: u32, size: u32) -> Vec<FvTile> {
    let mut tiles = Vec::new();
    for (i, (xno, yno)) in [(0, 0), (1, 0), (0, 1), (1, 1)].into_iter().enumerate() {
        let n = first_tile + i as u32;
        write_bytes(
            dir,
            &fv_tile_disk_name(n, "oif"),
            &utf16le(&oif_text(size, size, 5)),
        );
        tiles.push(FvTile {
            filename: fv_tile_name(n, "oif"),
            xno,
            yno,
        });
    }
    tiles
}

// =============================================================================
// FluoView 3000 Projects
// =============================================================================

/// One area (tile) of a FluoView 3000 group.
pub struct Fv3kArea {
    pub image: String,
    pub x: u32,
    pub y: u32,
}

pub fn fv3k_group_xml(
    object_id: &str,
    group_type: &str,
    enable: bool,
    nx: u32,
    ny: u32,
    areas: &[Fv3kArea],
) -> String {
    let mut xml = format!(
        "<matl:group xsi:type=\"{}\" objectId=\"{}\">\
         <marker:regionInfo xsi:type=\"marker:rectangleRegion\">\
         <marker:shape>Rectangle</marker:shape></marker:regionInfo>\
         <matl:enable>{}</matl:enable>\
         <matl:protocolGroupId>{}-protocol</matl:protocolGroupId>\
         <matl:areaInfo><matl:numOfXAreas>{}</matl:numOfXAreas>\
         <matl:numOfYAreas>{}</matl:numOfYAreas>\
         <matl:areaWidth>424000</matl:areaWidth><matl:areaHeight>424000</matl:areaHeight>\
         </matl:areaInfo>",
        group_type, object_id, enable, object_id, nx, ny
    );
    for area in areas {
        xml.push_str(&format!(
            "<matl:area><matl:image>{}</matl:image>\
             <matl:xIndex>{}</matl:xIndex><matl:yIndex>{}</matl:yIndex></matl:area>",
            area.image, area.x, area.y
        ));
    }
    xml.push_str("</matl:group>");
    xml
}

pub fn fv3k_project_xml(overlap: u32, groups: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <matl:properties xmlns:matl=\"{}\" xmlns:marker=\"{}\" xmlns:xsi=\"{}\" \
         version=\"2.2\" applicationVersion=\"2.3.1.163\" platformVersion=\"2.3.1.163\" id=\"matl\">\
         <matl:stage><matl:name>PRIOR,H101F</matl:name><matl:overlap>{}</matl:overlap></matl:stage>\
         {}</matl:properties>",
        ns::MATL,
        ns::MARKER,
        ns::XSI,
        overlap,
        groups.concat()
    )
}

/// Assert that two floats are equal within a small tolerance.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}
