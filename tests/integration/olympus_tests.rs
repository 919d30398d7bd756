//! Olympus image metadata readers on files written to disk.

use micrometa::format::olympus::{MetadataReader, OibReader, OirReader};
use micrometa::format::open_image;
use micrometa::{DatasetType, FormatError, ImageFormat, StoragePath};

use super::test_utils::*;

#[test]
fn test_open_oif() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bytes(dir.path(), "a/a_01.oif", &utf16le(&oif_text(640, 480, 9)));

    let image = open_image(&StoragePath::from_path(&path)).unwrap();
    assert_eq!(image.ds_type, DatasetType::Stack);
    assert_eq!(image.format, Some(ImageFormat::Oif));
    let dim = image.dimensions;
    assert_eq!((dim.x, dim.y, dim.z, dim.c, dim.t, dim.b), (640, 480, 9, 2, 1, 12));
}

#[test]
fn test_open_oib() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bytes(dir.path(), "b.oib", &oib_bytes(&oif_text(800, 600, 4)));

    let reader = OibReader::open(&StoragePath::from_path(&path)).unwrap();
    assert_eq!(reader.version(), "2.0.0.0");
    assert_eq!(reader.dimensions().y, 600);
}

#[test]
fn test_open_oir() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bytes(dir.path(), "c.oir", &oir_bytes(2048, 1024, 21));

    let reader = OirReader::open(&StoragePath::from_path(&path)).unwrap();
    let dim = reader.dimensions();
    assert_eq!((dim.x, dim.y, dim.z, dim.b), (2048, 1024, 21, 16));
    assert_eq!((dim.c, dim.t), (0, 0));
}

#[test]
fn test_oir_without_xml_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bytes(dir.path(), "d.oir", b"OLYMPUSRAWFORMAT\x00\x00\x00\x02 nothing here");

    let err = OirReader::open(&StoragePath::from_path(&path)).unwrap_err();
    assert!(matches!(err, FormatError::MissingXmlBlocks { .. }));
}

#[test]
fn test_oib_extension_but_oif_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bytes(dir.path(), "e.oib", &utf16le(&oif_text(1, 1, 1)));

    let err = open_image(&StoragePath::from_path(&path)).unwrap_err();
    assert!(matches!(err, FormatError::Container(_)));
}

#[test]
fn test_validate_filepath_suffix() {
    let dir = tempfile::tempdir().unwrap();
    write_bytes(dir.path(), "Slide1sec001/Slide1sec001_01.oif", &utf16le(&oif_text(8, 8, 1)));

    let requested = StoragePath::from_path(&dir.path().join("Slide1sec001/Slide1sec001.oif"));
    let image = open_image(&requested).unwrap();
    assert_eq!(image.storage.fname, "Slide1sec001_01.oif");
}
