//! Reads the files in `tests/files/ply/` through the public API.

use std::{
    fs,
    path::{Path, PathBuf},
};

use cgmath::Point3;
use failure::Error;
use plycloud::{
    PointCloud,
    ply::{self, Config, ErrorKind, Format, Reader},
};


fn file(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/files/ply").join(name)
}

/// The eight corners of the unit cube, colored by their position.
fn cube() -> PointCloud {
    let mut cloud = PointCloud::new();
    for &x in &[0u8, 1] {
        for &y in &[0u8, 1] {
            for &z in &[0u8, 1] {
                cloud.positions.push(Point3::new(x.into(), y.into(), z.into()));
                cloud.colors.push([x * 255, y * 255, z * 255, 255]);
            }
        }
    }
    cloud
}

#[test]
fn cube_in_both_encodings() -> Result<(), Error> {
    for &(name, format) in &[
        ("cube_ascii.ply", Format::Ascii),
        ("cube_ble.ply", Format::BinaryLittleEndian),
    ] {
        let reader = Reader::open(file(name))?;
        assert_eq!(reader.format(), format);
        assert_eq!(reader.vertex_count(), 8);
        assert_eq!(reader.header().comments(), &["unit cube corners".to_string()]);

        assert_eq!(reader.read()?, cube(), "{}", name);
    }

    Ok(())
}

#[test]
fn header_length_matches_file() -> Result<(), Error> {
    let data = fs::read(file("cube_ble.ply"))?;
    let reader = Reader::new(&*data)?;

    // 8 rows with 3 floats and 3 bytes each
    let header_len = reader.header().header_len() as usize;
    assert_eq!(reader.header().row_len(), 15);
    assert_eq!(data.len() - header_len, 8 * 15);
    assert!(data[..header_len].ends_with(b"end_header\n"));

    Ok(())
}

#[test]
fn ascii_and_binary_agree_after_rewrite() -> Result<(), Error> {
    let cloud = ply::open(file("cube_ascii.ply"))?;

    let binary = Config::binary().write_to_memory(&cloud)?;
    let ascii = Config::ascii().write_to_memory(&cloud)?;
    assert_eq!(ply::read(&*binary)?, ply::read(&*ascii)?);

    Ok(())
}

#[test]
fn errors_have_kinds() {
    let cases: &[(&[u8], ErrorKind)] = &[
        (b"", ErrorKind::BadMagic),
        (b"solid cube\nfacet normal 0 0 1\n", ErrorKind::BadMagic),
        (b"ply\nformat binary_big_endian 1.0\nend_header\n", ErrorKind::UnsupportedFormatLine),
        (b"ply\nformat ascii 1.0\nelement vertex\nend_header\n", ErrorKind::BadElementDeclaration),
        (
            b"ply\nformat ascii 1.0\nelement vertex 1\nproperty half x\nend_header\n1\n",
            ErrorKind::UnsupportedPropertyType,
        ),
        (
            b"ply\nformat ascii 1.0\nelement vertex 1\nproperty short x\nend_header\n1\n",
            ErrorKind::InvalidPropertyType,
        ),
        (
            b"ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nend_header\n1\n",
            ErrorKind::TruncatedBody,
        ),
        (
            b"ply\nformat binary_little_endian 1.0\nelement vertex 1\nproperty float x\n\
                end_header\n\x00\x00",
            ErrorKind::Io,
        ),
    ];

    for (src, kind) in cases {
        match ply::read(*src) {
            Ok(cloud) => panic!("expected {:?}, got {:?}", kind, cloud),
            Err(e) => assert_eq!(e.kind(), *kind, "{}", e),
        }
    }
}
