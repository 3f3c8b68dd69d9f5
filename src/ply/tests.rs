use std::io::Cursor;

use cgmath::Point3;
use failure::Error as AnyError;

use crate::{Point, PointCloud};
use super::{
    Axis, Channel, Config, Error, ErrorKind, Format, PropertyTag, Reader, ScalarLen,
    read,
};


const THREE_ASCII: &[u8] = include_bytes!("test_files/three_ascii.ply");
const THREE_BLE: &[u8] = include_bytes!("test_files/three_ble.ply");
const POSITIONS_CRLF: &[u8] = include_bytes!("test_files/positions_crlf_ascii.ply");


fn three_points() -> PointCloud {
    PointCloud {
        positions: vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, -2.0, 0.25),
            Point3::new(3.0, 4.0, 5.0),
        ],
        colors: vec![
            [255, 0, 0, 255],
            [0, 128, 0, 200],
            [10, 20, 30, 0],
        ],
    }
}

fn kind_of(src: &[u8]) -> ErrorKind {
    match read(src) {
        Ok(cloud) => panic!("expected error, got {:?}", cloud),
        Err(e) => e.kind(),
    }
}


// ===============================================================================================
// ===== Fixture files
// ===============================================================================================

#[test]
fn three_points_ascii() -> Result<(), AnyError> {
    let reader = Reader::new(THREE_ASCII)?;
    assert_eq!(reader.format(), Format::Ascii);
    assert_eq!(reader.vertex_count(), 3);
    assert_eq!(reader.header().comments(), &["three colored points".to_string()]);
    assert_eq!(reader.header().properties()[3], PropertyTag::Data(ScalarLen::Four));

    assert_eq!(reader.read()?, three_points());
    Ok(())
}

#[test]
fn three_points_binary_mixed_widths() -> Result<(), AnyError> {
    let reader = Reader::new(THREE_BLE)?;
    assert_eq!(reader.format(), Format::BinaryLittleEndian);
    assert_eq!(reader.header().header_len(), 308);
    assert_eq!(reader.header().properties(), &[
        PropertyTag::Position64(Axis::X),
        PropertyTag::Position64(Axis::Y),
        PropertyTag::Position64(Axis::Z),
        PropertyTag::Data(ScalarLen::Four),
        PropertyTag::Color16(Channel::Red),
        PropertyTag::Color8(Channel::Green),
        PropertyTag::Color32(Channel::Blue),
        PropertyTag::Color8(Channel::Alpha),
    ]);

    // The face element after the vertices is never looked at.
    assert_eq!(reader.read()?, three_points());
    Ok(())
}

#[test]
fn missing_colors_default_to_white() -> Result<(), AnyError> {
    let cloud = read(POSITIONS_CRLF)?;
    assert_eq!(cloud.positions, vec![Point3::new(1.0, 2.0, 3.0), Point3::new(-1.5, 0.0, 0.7)]);
    assert_eq!(cloud.colors, vec![[255; 4], [255; 4]]);
    Ok(())
}

#[test]
fn open_file() -> Result<(), AnyError> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/src/ply/test_files/three_ble.ply");
    assert_eq!(super::open(path)?, three_points());

    let e = super::open(concat!(env!("CARGO_MANIFEST_DIR"), "/does/not/exist.ply")).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Io);
    Ok(())
}


// ===============================================================================================
// ===== Binary body
// ===============================================================================================

fn ble(header_props: &str, count: u64, body: &[u8]) -> Vec<u8> {
    let mut out = format!(
        "ply\nformat binary_little_endian 1.0\nelement vertex {}\n{}end_header\n",
        count,
        header_props,
    ).into_bytes();
    out.extend_from_slice(body);
    out
}

#[test]
fn short_color_keeps_high_byte() -> Result<(), AnyError> {
    let src = ble("property short red\n", 1, &[0xCD, 0xAB]);
    let cloud = read(&*src)?;
    assert_eq!(cloud.colors, vec![[0xAB, 255, 255, 255]]);
    Ok(())
}

#[test]
fn float_color_is_scaled() -> Result<(), AnyError> {
    let mut body = vec![];
    body.extend_from_slice(&1.0f32.to_le_bytes());
    body.extend_from_slice(&0.5f32.to_le_bytes());
    let src = ble("property float green\nproperty float alpha\n", 1, &body);

    let cloud = read(&*src)?;
    assert_eq!(cloud.colors, vec![[255, 255, 255, 127]]);
    Ok(())
}

#[test]
fn data_properties_are_skipped() -> Result<(), AnyError> {
    let mut body = vec![];
    for &(c, x) in &[(0xDEAD_BEEFu32, 1.0f32), (7, 2.0)] {
        body.extend_from_slice(&c.to_le_bytes());
        body.extend_from_slice(&x.to_le_bytes());
        body.extend_from_slice(&[1, 2]);
    }
    let src = ble("property uint32 confidence\nproperty float x\nproperty int16 foo\n", 2, &body);

    let cloud = read(&*src)?;
    assert_eq!(cloud.positions, vec![Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)]);
    Ok(())
}

#[test]
fn zero_vertices_give_empty_cloud() -> Result<(), AnyError> {
    let src = ble("property float x\n", 0, b"garbage that is never read");
    assert!(read(&*src)?.is_empty());

    let src = b"ply\nformat ascii 1.0\nend_header\n";
    assert!(read(&src[..])?.is_empty());
    Ok(())
}

#[test]
fn rows_without_properties_read_nothing() -> Result<(), AnyError> {
    let src = ble("", 3, &[1, 2, 3]);
    let cloud = read(&*src)?;
    assert_eq!(cloud.positions, vec![Point3::new(0.0, 0.0, 0.0); 3]);
    assert_eq!(cloud.colors, vec![[255; 4]; 3]);
    Ok(())
}

#[test]
fn binary_truncation_is_io_error() {
    let src = ble("property float x\nproperty float y\n", 2, &[0; 12]);
    assert_eq!(kind_of(&src), ErrorKind::Io);

    let src = ble("property uchar red\n", 3, &[]);
    assert_eq!(kind_of(&src), ErrorKind::Io);
}

#[test]
fn body_starts_right_after_crlf_header() -> Result<(), AnyError> {
    let mut src = b"ply\r\nformat binary_little_endian 1.0\r\n\
        element vertex 1\r\nproperty uchar red\r\nend_header\r\n".to_vec();
    src.push(0x0A);
    assert_eq!(read(&*src)?.colors, vec![[0x0A, 255, 255, 255]]);
    Ok(())
}


// ===============================================================================================
// ===== ASCII body
// ===============================================================================================

fn ascii(header_props: &str, count: u64, body: &str) -> Vec<u8> {
    format!(
        "ply\nformat ascii 1.0\nelement vertex {}\n{}end_header\n{}",
        count,
        header_props,
        body,
    ).into_bytes()
}

#[test]
fn ascii_missing_values() {
    let props = "property float x\nproperty float y\nproperty float z\nproperty uchar red\n";
    let src = ascii(props, 1, "1.0 2.0\n");
    match read(&*src) {
        Err(Error::TruncatedBody { row: 0, .. }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn ascii_missing_row() {
    let src = ascii("property float x\n", 3, "1\n2\n");
    match read(&*src) {
        Err(Error::TruncatedBody { row: 2, .. }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn ascii_invalid_values() {
    for body in &["abc\n", "256\n", "-1\n", "1,5\n", "\u{e4}\n"] {
        let src = ascii("property uchar red\n", 1, body);
        assert_eq!(kind_of(&src), ErrorKind::TruncatedBody, "{:?}", body);
    }
}

#[test]
fn ascii_skips_unnamed_tokens() -> Result<(), AnyError> {
    let props = "property double confidence\nproperty float x\nproperty ushort blue\n";
    let src = ascii(props, 2, "not_a_number 1 65535\n0.5e3 -4.25 256 extra tokens\n");

    let cloud = read(&*src)?;
    assert_eq!(cloud.positions, vec![Point3::new(1.0, 0.0, 0.0), Point3::new(-4.25, 0.0, 0.0)]);
    assert_eq!(cloud.colors, vec![[255, 255, 255, 255], [255, 255, 1, 255]]);
    Ok(())
}

#[test]
fn ascii_float_colors_and_double_positions() -> Result<(), AnyError> {
    let props = "property double x\nproperty float red\nproperty float alpha\n";
    let src = ascii(props, 2, "1.25 1.0 0.5\n-3.5 0.999 2.0\n");

    // Colors are truncated like in binary files, out of range values saturate
    let cloud = read(&*src)?;
    assert_eq!(cloud.positions, vec![Point3::new(1.25, 0.0, 0.0), Point3::new(-3.5, 0.0, 0.0)]);
    assert_eq!(cloud.colors, vec![[255, 255, 255, 127], [254, 255, 255, 255]]);
    Ok(())
}

#[test]
fn last_row_without_linebreak() -> Result<(), AnyError> {
    let src = ascii("property float z\n", 2, "1\n2");
    assert_eq!(read(&*src)?.positions.last(), Some(&Point3::new(0.0, 0.0, 2.0)));
    Ok(())
}

#[test]
fn attributes_are_overwritten_per_row() -> Result<(), AnyError> {
    let props = "property float y\nproperty uchar alpha\n";
    let src = ascii(props, 2, "1 10\n2 20\n");

    let cloud = read(&*src)?;
    let points: Vec<_> = cloud.iter().collect();
    assert_eq!(points, vec![
        (Point3::new(0.0, 1.0, 0.0), [255, 255, 255, 10]),
        (Point3::new(0.0, 2.0, 0.0), [255, 255, 255, 20]),
    ]);
    Ok(())
}


// ===============================================================================================
// ===== Round trips through the writer
// ===============================================================================================

fn sample_cloud() -> PointCloud {
    let mut cloud = PointCloud::new();
    for i in 0..50u8 {
        let f = f32::from(i);
        cloud.push(&Point {
            position: Point3::new(f * 0.1, -f / 3.0, f * f * 1e-3),
            color: [i, 255 - i, i.wrapping_mul(7), 128],
        });
    }
    cloud
}

#[test]
fn write_and_read_binary() -> Result<(), AnyError> {
    let cloud = sample_cloud();
    let data = Config::binary().add_comment("round trip").write_to_memory(&cloud)?;
    assert_eq!(read(Cursor::new(data))?, cloud);
    Ok(())
}

#[test]
fn write_and_read_ascii() -> Result<(), AnyError> {
    let cloud = sample_cloud();
    let data = Config::ascii().write_to_memory(&cloud)?;
    assert_eq!(read(&*data)?, cloud);
    Ok(())
}

#[test]
fn rewrite_fixture() -> Result<(), AnyError> {
    let original = read(THREE_BLE)?;
    let data = Config::ascii().write_to_memory(&original)?;

    let reader = Reader::new(&*data)?;
    assert_eq!(reader.header().properties().len(), 7);
    assert_eq!(reader.read()?, original);
    Ok(())
}
